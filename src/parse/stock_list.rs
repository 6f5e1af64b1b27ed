use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, trace};

use super::html::{text, ANCHOR, SPAN, TABLE, TD, TR};
use crate::error::{ExtractError, Result};
use crate::model::StockEntry;

static TOP_FLOP_BOX: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article.top-flop-box").expect("valid top-flop-box selector"));

static DETAIL_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/aktien/(.*)-Aktie-(.*)").expect("valid detail link regex"));

/// Constituents listed on an index page, in page order.
///
/// Rows whose first cell has no relative `/aktien/<name>-Aktie-<id>` link are skipped.
pub fn parse_stock_list(html: &str) -> Result<Vec<StockEntry>> {
    let document = Html::parse_document(html);
    let article = document
        .select(&TOP_FLOP_BOX)
        .next()
        .ok_or(ExtractError::MissingSection {
            section: "top-flop-box",
        })?;
    let table = article
        .select(&TABLE)
        .next()
        .ok_or_else(|| ExtractError::MissingTable {
            table: "top-flop-box".to_owned(),
        })?;

    let mut entries = Vec::new();
    for row in table.select(&TR) {
        let Some(first) = row.select(&TD).next() else {
            continue;
        };
        let Some(href) = first
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        if !href.starts_with('/') {
            trace!(href, "skipping absolute link");
            continue;
        }
        let Some(caps) = DETAIL_LINK.captures(href) else {
            trace!(href, "skipping non-stock link");
            continue;
        };

        let sector = first.select(&SPAN).next().map(text).unwrap_or_default();
        entries.push(StockEntry {
            id: caps[2].to_owned(),
            name: caps[1].to_owned(),
            sector,
        });
    }

    debug!(count = entries.len(), "parsed stock list");
    Ok(entries)
}
