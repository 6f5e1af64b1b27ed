//! Orchestration: read the dumped files of one stock or index and fill its record.

mod index;
mod stock;

use std::{fs, io, path::Path};

use chrono::{Local, NaiveDate};

use crate::error::{ExtractError, Result};
use crate::years::YearContext;

pub use index::{extract_index, read_stocks};
pub use stock::{apply_fundamentals, extract_stock, load_ratings};

/// Dates fixed for one extraction run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub today: NaiveDate,
    pub years: YearContext,
}

impl RunContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            years: YearContext::from_date(today),
        }
    }

    pub fn now() -> Self {
        Self::new(Local::now().date_naive())
    }
}

fn read_required(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ExtractError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => ExtractError::io(path, e),
    })
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ExtractError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalystRatings, IndexGroup, Stock};
    use crate::storage::{DumpStorage, Storage};
    use std::fs;
    use tempfile::tempdir;

    const LIST: &str = r#"
<article class="top-flop-box"><table>
  <tr><td><a href="/aktien/SAP-Aktie-DE0007164600">SAP</a><span>Software</span></td></tr>
  <tr><td><a href="/aktien/BASF-Aktie-DE000BASF111">BASF</a><span>Chemie</span></td></tr>
</table></article>"#;

    const FUNDAMENTALS: &str = r#"
<article class="KENNZAHLEN">
  <table>
    <thead><tr><th>Gewinn<em>?</em><span>EUR</span></th><th>2023</th><th>2024</th><th>2025</th></tr></thead>
    <tbody>
      <tr><td>KGV</td><td>20,0</td><td>18,0</td><td>16,0</td></tr>
      <tr><td>Gewinn pro Aktie in EUR</td><td>4,00</td><td>4,50</td><td>5,00</td></tr>
    </tbody>
  </table>
  <table>
    <thead><tr><th>Rentabilität</th><th>2023</th></tr></thead>
    <tbody>
      <tr><td>Eigenkapitalrendite</td><td>12,0%</td></tr>
      <tr><td>EBIT-Marge</td><td>20,5%</td></tr>
    </tbody>
  </table>
  <table>
    <thead><tr><th>Bilanz</th><th>2023</th></tr></thead>
    <tbody><tr><td>Eigenkapitalquote</td><td>40,0%</td></tr></tbody>
  </table>
  <table>
    <thead><tr><th>Marktkapitalisierung</th><th>2023</th></tr></thead>
    <tbody><tr><td>Marktkapitalisierung in Mio. EUR</td><td>200.000</td></tr></tbody>
  </table>
</article>"#;

    #[test]
    fn extracts_index_and_its_constituents_from_one_dump() -> anyhow::Result<()> {
        let root = tempdir()?;
        fs::create_dir_all(root.path().join("DAX"))?;
        let ctx = RunContext::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());

        let index_storage = DumpStorage::for_index(root.path(), "DAX");
        fs::write(index_storage.storage_path("list", "html"), LIST)?;
        fs::write(
            index_storage.storage_path("history-0", "csv"),
            "Datum;Schluss\n31.01.2024;16.900,00\n",
        )?;

        let sap = DumpStorage::for_stock(root.path(), "DAX", "DE0007164600");
        fs::write(sap.storage_path("fundamental", "html"), FUNDAMENTALS)?;
        fs::write(
            sap.storage_path("history-0", "csv"),
            "Datum;Schluss\n31.01.2024;172,50\n",
        )?;

        let mut index = IndexGroup::new("DAX");
        read_stocks(&mut index, &index_storage)?;
        extract_index(&mut index, &index_storage, &ctx)?;
        assert_eq!(index.history.today, 16_900.0);
        assert_eq!(index.stocks.len(), 2);

        let results: Vec<_> = index
            .stocks
            .iter()
            .map(|entry| {
                let storage = DumpStorage::for_stock(root.path(), "DAX", &entry.id);
                extract_stock(Stock::from(entry), &storage, &ctx)
            })
            .collect();

        let sap = results[0].as_ref().map_err(|e| anyhow::anyhow!("{e}"))?;
        assert_eq!(sap.name, "SAP");
        assert_eq!(sap.sector, "Software");
        assert_eq!(sap.per, 18.0);
        assert_eq!(sap.per_5_years, 19.0);
        assert_eq!(sap.eps_next_year, 5.0);
        assert_eq!(sap.market_capitalization, 200_000_000_000.0);
        assert_eq!(sap.history.today, 172.5);
        assert_eq!(sap.ratings, AnalystRatings::default());

        // BASF was listed but never dumped
        let err = results[1].as_ref().unwrap_err();
        assert!(matches!(err, ExtractError::MissingFile { .. }));
        assert!(err.is_missing_data());
        Ok(())
    }
}
