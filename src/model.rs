use serde::Serialize;

/// Closing prices at fixed lookbacks from the reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct History {
    pub today: f64,
    pub six_months: f64,
    pub one_year: f64,
}

impl History {
    pub fn new(today: f64, six_months: f64, one_year: f64) -> Self {
        Self {
            today,
            six_months,
            one_year,
        }
    }
}

/// Month-end closing prices, oldest first (four, three, two and one month back).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthClosings {
    pub closings: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalystRatings {
    pub buy: u32,
    pub hold: u32,
    pub sell: u32,
}

impl AnalystRatings {
    pub fn new(buy: u32, hold: u32, sell: u32) -> Self {
        Self { buy, hold, sell }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stock {
    pub id: String,
    pub name: String,
    pub sector: String,
    pub roi: f64,
    pub ebit_margin: f64,
    pub equity_ratio: f64,
    pub per: f64,
    pub per_5_years: f64,
    pub eps_current_year: f64,
    pub eps_next_year: f64,
    pub market_capitalization: f64,
    pub history: History,
    pub month_closings: MonthClosings,
    pub ratings: AnalystRatings,
}

impl Stock {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sector: sector.into(),
            ..Default::default()
        }
    }
}

/// A constituent as listed on the index page, before extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockEntry {
    pub id: String,
    pub name: String,
    pub sector: String,
}

impl From<&StockEntry> for Stock {
    fn from(entry: &StockEntry) -> Self {
        Stock::new(&entry.id, &entry.name, &entry.sector)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexGroup {
    pub name: String,
    pub history: History,
    pub month_closings: MonthClosings,
    pub stocks: Vec<StockEntry>,
}

impl IndexGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_stock(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        sector: impl Into<String>,
    ) {
        self.stocks.push(StockEntry {
            id: id.into(),
            name: name.into(),
            sector: sector.into(),
        });
    }
}
