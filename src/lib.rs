//! Turns dumped onvista fundamentals pages, ratings pages, index lists and
//! daily price CSVs into normalized stock and index records.

pub mod error;
pub mod extract;
pub mod model;
pub mod parse;
pub mod prices;
pub mod storage;
pub mod years;

pub use error::ExtractError;
pub use extract::{extract_index, extract_stock, read_stocks, RunContext};
pub use model::{AnalystRatings, History, IndexGroup, MonthClosings, Stock, StockEntry};
pub use storage::{DumpStorage, Storage};
pub use years::{Period, YearContext, YearPair};
