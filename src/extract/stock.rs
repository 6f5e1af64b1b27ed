use tracing::{debug, info};

use super::{read_optional, read_required, RunContext};
use crate::error::Result;
use crate::model::{AnalystRatings, Stock};
use crate::parse::{parse_ratings, Fundamentals};
use crate::prices;
use crate::storage::Storage;
use crate::years::{Period, YearContext};

const PROFITABILITY: &str = "Rentabilität";
const BALANCE_SHEET: &str = "Bilanz";
const EARNINGS: &str = "Gewinn";
const MARKET_CAP: &str = "Marktkapitalisierung";

const RETURN_ON_EQUITY: &str = "Eigenkapitalrendite";
const EBIT_MARGIN: &str = "EBIT-Marge";
const EQUITY_RATIO: &str = "Eigenkapitalquote";
const PRICE_EARNINGS: &str = "KGV";
const EARNINGS_PER_SHARE: &str = "Gewinn pro Aktie in EUR";
const MARKET_CAP_MILLIONS: &str = "Marktkapitalisierung in Mio. EUR";

/// Fill the fundamentals, prices and ratings of `stock` from its dump.
///
/// The fundamentals page is required; ratings and price files are optional.
#[tracing::instrument(level = "info", skip_all, fields(stock = %stock.id))]
pub fn extract_stock(mut stock: Stock, storage: &dyn Storage, ctx: &RunContext) -> Result<Stock> {
    let html = read_required(&storage.storage_path("fundamental", "html"))?;
    let fundamentals = Fundamentals::parse(&html)?;
    debug!(tables = fundamentals.len(), "fundamentals parsed");

    apply_fundamentals(&mut stock, &fundamentals, &ctx.years)?;

    stock.history = prices::history(storage, ctx.today)?;
    stock.month_closings = prices::month_closings(storage)?;
    stock.ratings = load_ratings(storage)?;

    info!(per = stock.per, market_cap = stock.market_capitalization, "stock extracted");
    Ok(stock)
}

/// Resolve every fundamental metric of `stock` for its period.
pub fn apply_fundamentals(
    stock: &mut Stock,
    fundamentals: &Fundamentals,
    years: &YearContext,
) -> Result<()> {
    let last = years.labels(Period::Last);
    let current = years.labels(Period::Current);
    let next = years.labels(Period::Next);

    stock.roi = fundamentals
        .metric(PROFITABILITY, RETURN_ON_EQUITY)?
        .resolve(last);
    stock.ebit_margin = fundamentals.metric(PROFITABILITY, EBIT_MARGIN)?.resolve(last);
    stock.equity_ratio = fundamentals.metric(BALANCE_SHEET, EQUITY_RATIO)?.resolve(last);

    let pers = fundamentals.metric(EARNINGS, PRICE_EARNINGS)?;
    stock.per_5_years = pers.average_up_to(&current.plain);
    stock.per = pers.resolve(current);

    let eps = fundamentals.metric(EARNINGS, EARNINGS_PER_SHARE)?;
    stock.eps_current_year = eps.resolve(current);
    stock.eps_next_year = eps.resolve(next);

    let market_cap = fundamentals
        .metric(MARKET_CAP, MARKET_CAP_MILLIONS)?
        .resolve(last);
    stock.market_capitalization = if market_cap > 0.0 {
        market_cap * 1_000_000.0
    } else {
        market_cap
    };

    Ok(())
}

/// Analyst ratings of the stock; all zero when no ratings page was dumped.
pub fn load_ratings(storage: &dyn Storage) -> Result<AnalystRatings> {
    let path = storage.storage_path("ratings", "html");
    match read_optional(&path)? {
        Some(html) => parse_ratings(&html),
        None => {
            debug!(path = %path.display(), "no ratings page");
            Ok(AnalystRatings::default())
        }
    }
}
