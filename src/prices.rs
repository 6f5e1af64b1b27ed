//! Closing prices from the per-bucket daily price CSVs.
//!
//! Each lookback bucket (0, 1, 2, 3, 4, 6 and 12 months) has its own file,
//! semicolon separated, with `Datum` (`DD.MM.YYYY`) and `Schluss` columns,
//! sorted ascending by date.

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use chrono::{Duration, Months, NaiveDate};
use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::{debug, trace};

use crate::error::{ExtractError, Result};
use crate::model::{History, MonthClosings};
use crate::parse::parse_number;
use crate::storage::Storage;

const DATE_COLUMN: &str = "Datum";
const CLOSE_COLUMN: &str = "Schluss";
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Buckets read for [`History`]: today, six months and one year back.
pub const HISTORY_BUCKETS: [u32; 3] = [0, 6, 12];
/// Buckets read for [`MonthClosings`], oldest first.
pub const CLOSING_BUCKETS: [u32; 4] = [4, 3, 2, 1];

pub fn history_kind(months: u32) -> String {
    format!("history-{}", months)
}

/// "Yesterday", moved back by `months` calendar months (clamped to month end).
pub fn reference_date(today: NaiveDate, months: u32) -> NaiveDate {
    let yesterday = today - Duration::days(1);
    yesterday
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// One dated row of a price file. `close` may be empty on non-trading days.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: String,
    pub close: String,
}

/// Streaming reader over a price file, yielding only rows with a date.
pub struct PriceSeries {
    path: PathBuf,
    reader: Reader<File>,
    date_col: usize,
    close_col: usize,
    record: StringRecord,
}

impl PriceSeries {
    /// Opens `path`; a missing file is `Ok(None)`.
    pub fn open(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "price file absent");
                return Ok(None);
            }
            Err(e) => return Err(ExtractError::io(path, e)),
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .flexible(true)
            .from_reader(file);
        let headers = reader.headers().map_err(|source| ExtractError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| ExtractError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name,
                })
        };
        let date_col = column(DATE_COLUMN)?;
        let close_col = column(CLOSE_COLUMN)?;

        Ok(Some(Self {
            path: path.to_path_buf(),
            reader,
            date_col,
            close_col,
            record: StringRecord::new(),
        }))
    }

    pub fn parse_date(&self, row: &PriceRow) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|_| ExtractError::InvalidDate {
            path: self.path.clone(),
            value: row.date.clone(),
        })
    }
}

impl Iterator for PriceSeries {
    type Item = Result<PriceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(source) => {
                    return Some(Err(ExtractError::Csv {
                        path: self.path.clone(),
                        source,
                    }))
                }
            }

            let date = self.record.get(self.date_col).unwrap_or("").trim();
            if date.is_empty() {
                continue;
            }
            let close = self.record.get(self.close_col).unwrap_or("").trim();
            return Some(Ok(PriceRow {
                date: date.to_owned(),
                close: close.to_owned(),
            }));
        }
    }
}

/// Last non-blank closing price seen so far; starts at `"0"`.
struct CarriedClose(String);

impl Default for CarriedClose {
    fn default() -> Self {
        Self("0".to_owned())
    }
}

impl CarriedClose {
    fn observe(&mut self, close: &str) {
        if !close.is_empty() {
            close.clone_into(&mut self.0);
        }
    }

    fn value(&self) -> f64 {
        parse_number(&self.0)
    }
}

/// Closing price as of `reference`: carry forward until the first row dated after it.
pub fn price_as_of(path: &Path, reference: NaiveDate) -> Result<f64> {
    let Some(mut series) = PriceSeries::open(path)? else {
        return Ok(0.0);
    };

    let mut carried = CarriedClose::default();
    while let Some(row) = series.next() {
        let row = row?;
        if series.parse_date(&row)? > reference {
            trace!(date = %row.date, "passed reference date");
            break;
        }
        carried.observe(&row.close);
    }
    Ok(carried.value())
}

/// Last closing price in the file.
///
/// Known limitation: the whole file is scanned with no date cutoff, so rows
/// dated after the bucket's month are included when the file contains them.
pub fn month_end_price(path: &Path) -> Result<f64> {
    let Some(series) = PriceSeries::open(path)? else {
        return Ok(0.0);
    };

    let mut carried = CarriedClose::default();
    for row in series {
        carried.observe(&row?.close);
    }
    Ok(carried.value())
}

/// Reference-date price of one bucket.
pub fn historical_price(storage: &dyn Storage, months: u32, today: NaiveDate) -> Result<f64> {
    let path = storage.storage_path(&history_kind(months), "csv");
    price_as_of(&path, reference_date(today, months))
}

/// Month-end price of one bucket.
pub fn closing_price(storage: &dyn Storage, months: u32) -> Result<f64> {
    let path = storage.storage_path(&history_kind(months), "csv");
    month_end_price(&path)
}

pub fn history(storage: &dyn Storage, today: NaiveDate) -> Result<History> {
    let [today_bucket, half_year, year] = HISTORY_BUCKETS;
    Ok(History::new(
        historical_price(storage, today_bucket, today)?,
        historical_price(storage, half_year, today)?,
        historical_price(storage, year, today)?,
    ))
}

pub fn month_closings(storage: &dyn Storage) -> Result<MonthClosings> {
    let closings = CLOSING_BUCKETS
        .iter()
        .map(|&months| closing_price(storage, months))
        .collect::<Result<Vec<_>>>()?;
    Ok(MonthClosings { closings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DumpStorage;
    use std::fs;
    use tempfile::tempdir;

    const JANUARY: &str = "Datum;Eroeffnung;Schluss\n\
                           01.01.2024;9,50;10\n\
                           ;;\n\
                           15.01.2024;11,00;12\n\
                           01.02.2024;12,10;\n";

    fn date(d: u32, m: u32, y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reference_mode_stops_after_reference_date() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("prices.csv");
        fs::write(&path, JANUARY)?;

        assert_eq!(price_as_of(&path, date(31, 1, 2024))?, 12.0);
        assert_eq!(price_as_of(&path, date(14, 1, 2024))?, 10.0);
        assert_eq!(price_as_of(&path, date(1, 1, 2024))?, 10.0);
        assert_eq!(price_as_of(&path, date(31, 12, 2023))?, 0.0);
        Ok(())
    }

    #[test]
    fn month_end_mode_scans_everything() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("prices.csv");
        fs::write(&path, JANUARY)?;

        assert_eq!(month_end_price(&path)?, 12.0);
        Ok(())
    }

    #[test]
    fn month_end_mode_includes_rows_past_the_month() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("prices.csv");
        fs::write(&path, "Datum;Schluss\n30.01.2024;10\n05.02.2024;1.234,50\n")?;

        assert_eq!(month_end_price(&path)?, 1234.5);
        Ok(())
    }

    #[test]
    fn missing_file_is_zero() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("absent.csv");

        assert_eq!(price_as_of(&path, date(1, 1, 2024))?, 0.0);
        assert_eq!(month_end_price(&path)?, 0.0);
        Ok(())
    }

    #[test]
    fn bad_date_fails_reference_mode_only() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("prices.csv");
        fs::write(&path, "Datum;Schluss\n2024-01-01;10\n")?;

        assert!(matches!(
            price_as_of(&path, date(1, 1, 2024)),
            Err(ExtractError::InvalidDate { .. })
        ));
        assert_eq!(month_end_price(&path)?, 10.0);
        Ok(())
    }

    #[test]
    fn missing_close_column_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("prices.csv");
        fs::write(&path, "Datum;Kurs\n01.01.2024;10\n")?;

        assert!(matches!(
            month_end_price(&path),
            Err(ExtractError::MissingColumn {
                column: "Schluss",
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn reference_date_is_yesterday_minus_months() {
        assert_eq!(reference_date(date(1, 2, 2024), 0), date(31, 1, 2024));
        assert_eq!(reference_date(date(1, 4, 2024), 1), date(29, 2, 2024));
        assert_eq!(reference_date(date(16, 3, 2024), 12), date(15, 3, 2023));
    }

    #[test]
    fn bucket_files_come_from_storage() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let storage = DumpStorage::new(dir.path(), "SAP");
        fs::write(
            storage.storage_path("history-0", "csv"),
            "Datum;Schluss\n30.01.2024;100\n31.01.2024;101\n",
        )?;
        fs::write(
            storage.storage_path("history-6", "csv"),
            "Datum;Schluss\n28.07.2023;80\n01.08.2023;85\n",
        )?;
        fs::write(
            storage.storage_path("history-1", "csv"),
            "Datum;Schluss\n29.12.2023;95\n",
        )?;

        let history = history(&storage, date(1, 2, 2024))?;
        assert_eq!(history, History::new(101.0, 80.0, 0.0));

        let closings = month_closings(&storage)?;
        assert_eq!(closings.closings, vec![0.0, 0.0, 0.0, 95.0]);
        Ok(())
    }
}
