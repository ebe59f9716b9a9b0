use crate::config::MIN_TABLE_DIMENSION;
use crate::core::error::{ExtractError, Result};
use crate::document::layout::TableLayout;

/// Picks the timetable among the tables of a page.
///
/// Small legend tables are filtered out by size. More than one large table
/// is ambiguous; none at all falls back to the first table found.
pub fn select_main_table(tables: &[TableLayout]) -> Result<&TableLayout> {
    let first = tables.first().ok_or(ExtractError::NoTable)?;

    let candidates: Vec<&TableLayout> = tables
        .iter()
        .enumerate()
        .filter(|(index, table)| {
            let (width, height) = (table.bbox.width(), table.bbox.height());
            log::debug!("table {}: width {:.0}, height {:.0}", index + 1, width, height);
            width >= MIN_TABLE_DIMENSION && height >= MIN_TABLE_DIMENSION
        })
        .map(|(_, table)| table)
        .collect();

    match candidates.as_slice() {
        [table] => Ok(*table),
        [] => {
            log::warn!("no table meets the minimum dimensions, using the first table");
            Ok(first)
        }
        many => Err(ExtractError::AmbiguousTable { count: many.len() }),
    }
}
