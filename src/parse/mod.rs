//! Pure parsers over dumped page text: no file access happens here.

pub mod fundamentals;
pub(crate) mod html;
pub mod number;
pub mod ratings;
pub mod stock_list;

pub use fundamentals::{Fundamentals, MetricTable, YearValues};
pub use number::parse_number;
pub use ratings::parse_ratings;
pub use stock_list::parse_stock_list;
