use scraper::Html;
use tracing::{debug, warn};

use super::html::{text, text_without, TD, TR};
use crate::error::{ExtractError, Result};
use crate::model::AnalystRatings;

/// Count analyst recommendations from a ratings page.
///
/// Each row holds a category (`kaufen`, `halten`, `verkaufen`) and a count
/// whose cell also carries a decorative bar `div`. Unknown categories are ignored.
pub fn parse_ratings(html: &str) -> Result<AnalystRatings> {
    let document = Html::parse_document(html);
    let mut ratings = AnalystRatings::default();

    for row in document.select(&TR) {
        let cells: Vec<_> = row.select(&TD).take(2).collect();
        let [category, count] = cells.as_slice() else {
            continue;
        };

        let category = text(*category);
        let raw = text_without(*count, &["div"]);
        let slot = match category.as_str() {
            "kaufen" => &mut ratings.buy,
            "halten" => &mut ratings.hold,
            "verkaufen" => &mut ratings.sell,
            other => {
                warn!(category = other, "ignoring unknown rating category");
                continue;
            }
        };
        *slot = raw.parse().map_err(|_| ExtractError::InvalidCount {
            category: category.clone(),
            value: raw.clone(),
        })?;
    }

    debug!(?ratings, "parsed analyst ratings");
    Ok(ratings)
}
