use tracing::info;

use super::{read_required, RunContext};
use crate::error::Result;
use crate::model::IndexGroup;
use crate::parse::parse_stock_list;
use crate::prices;
use crate::storage::Storage;

/// Fill price history and month closings of an index. Indices carry no fundamentals.
#[tracing::instrument(level = "info", skip_all, fields(index = %index.name))]
pub fn extract_index(index: &mut IndexGroup, storage: &dyn Storage, ctx: &RunContext) -> Result<()> {
    index.history = prices::history(storage, ctx.today)?;
    index.month_closings = prices::month_closings(storage)?;
    Ok(())
}

/// Append the constituents listed on the index page (`<index>.list.html`).
#[tracing::instrument(level = "info", skip_all, fields(index = %index.name))]
pub fn read_stocks(index: &mut IndexGroup, storage: &dyn Storage) -> Result<()> {
    let html = read_required(&storage.storage_path("list", "html"))?;
    let entries = parse_stock_list(&html)?;
    info!(count = entries.len(), "constituents listed");

    for entry in entries {
        index.add_stock(entry.id, entry.name, entry.sector);
    }
    Ok(())
}
