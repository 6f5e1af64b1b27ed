use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::html::{text, text_without, BODY_ROWS, TABLE, TD, TH};
use super::number::parse_number;
use crate::error::{ExtractError, Result};
use crate::years::YearPair;

static KENNZAHLEN: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article.KENNZAHLEN").expect("valid KENNZAHLEN selector"));

/// Raw cell text of one metric row, keyed by the year label printed in the column header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearValues(BTreeMap<String, String>);

impl YearValues {
    pub fn get(&self, year: &str) -> Option<&str> {
        self.0.get(year).map(String::as_str)
    }

    pub fn insert(&mut self, year: impl Into<String>, value: impl Into<String>) {
        self.0.insert(year.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw text for the period, trying the plain label before the cross label.
    pub fn lookup(&self, labels: &YearPair) -> Option<&str> {
        labels.candidates().into_iter().find_map(|label| self.get(label))
    }

    /// Numeric value for the period; `0.0` when neither label is present.
    pub fn resolve(&self, labels: &YearPair) -> f64 {
        self.lookup(labels).map(parse_number).unwrap_or(0.0)
    }

    /// Mean of every value whose label sorts at or before `current_year`.
    ///
    /// Labels compare as strings, so `"2023/24" <= "2024"` but `"2024/25" > "2024"`.
    pub fn average_up_to(&self, current_year: &str) -> f64 {
        let (sum, count) = self
            .0
            .iter()
            .filter(|(label, _)| label.as_str() <= current_year)
            .fold((0.0, 0usize), |(sum, count), (_, value)| {
                (sum + parse_number(value), count + 1)
            });

        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for YearValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One sub-table of the fundamentals section, e.g. "Gewinn" or "Bilanz".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricTable {
    name: String,
    rows: HashMap<String, YearValues>,
}

impl MetricTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: &str) -> Result<&YearValues> {
        self.rows.get(row).ok_or_else(|| ExtractError::MissingRow {
            table: self.name.clone(),
            row: row.to_owned(),
        })
    }
}

/// All metric tables of a fundamentals page, keyed by their header label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fundamentals {
    tables: HashMap<String, MetricTable>,
}

impl Fundamentals {
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let section = document
            .select(&KENNZAHLEN)
            .next()
            .ok_or(ExtractError::MissingSection {
                section: "KENNZAHLEN",
            })?;

        let mut tables = HashMap::new();
        for table in section.select(&TABLE) {
            let Some(parsed) = parse_table(table) else {
                continue;
            };
            debug!(table = %parsed.name, rows = parsed.rows.len(), "parsed metric table");
            tables.insert(parsed.name.clone(), parsed);
        }

        Ok(Self { tables })
    }

    pub fn table(&self, name: &str) -> Result<&MetricTable> {
        self.tables
            .get(name)
            .ok_or_else(|| ExtractError::MissingTable {
                table: name.to_owned(),
            })
    }

    /// Year values of `row` in `table`; either missing is a lookup failure.
    pub fn metric(&self, table: &str, row: &str) -> Result<&YearValues> {
        self.table(table)?.row(row)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Returns `None` for a table without any header cell.
fn parse_table(table: ElementRef<'_>) -> Option<MetricTable> {
    let mut header_cells = table.select(&TH);
    let name = text_without(header_cells.next()?, &["em", "span"]);

    // column 0 is the row label column
    let mut headers = vec![String::new()];
    headers.extend(header_cells.map(text));
    trace!(table = %name, ?headers, "header row");

    let mut rows = HashMap::new();
    for row in table.select(&BODY_ROWS) {
        let mut cells = row.select(&TD);
        let Some(label_cell) = cells.next() else {
            continue;
        };
        let label = text(label_cell);
        if label.is_empty() {
            break;
        }

        let mut values = YearValues::default();
        for (index, cell) in cells.enumerate() {
            match headers.get(index + 1) {
                Some(year) if !year.is_empty() => values.insert(year.clone(), text(cell)),
                _ => {}
            }
        }
        rows.insert(label, values);
    }

    Some(MetricTable { name, rows })
}
