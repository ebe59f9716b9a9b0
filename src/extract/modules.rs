use crate::core::emptiness::is_mostly_white;
use crate::core::error::{ExtractError, Result, SlotEdge};
use crate::core::geometry::timeslot_for_area;
use crate::core::model::{RawExtractedModule, Weekday};
use crate::document::PageSource;
use crate::extract::layout_map::{TableLayoutMap, UnmergedTimeEntries};
use crate::extract::merge::{merge_vertically_spanning_cells, CellQueue};

/// Extracts the modules of one weekday column on one page.
///
/// The start slot comes from the unmerged first cell and the end slot from
/// the merged area: merging moves the bottom edge but never the top.
pub fn modules_for_weekday(
    page: &dyn PageSource,
    weekday: Weekday,
    entries: &UnmergedTimeEntries,
    layout: &TableLayoutMap,
    page_number: usize,
) -> Result<Vec<RawExtractedModule>> {
    let lowest_y = layout.lowest_y().ok_or_else(|| {
        ExtractError::IncompleteLayout("no y level for the last time slot".to_string())
    })?;

    let mut queue = CellQueue::new(&entries.cells);
    let mut modules = Vec::new();

    while let Some(initial) = queue.pop_front() {
        if is_mostly_white(&page.rasterize(&initial)?) {
            log::debug!("{weekday}: empty cell skipped");
            continue;
        }

        let merged = merge_vertically_spanning_cells(
            initial,
            &mut queue,
            &entries.horizontal_lines,
            lowest_y,
            weekday,
        )?;

        let start = timeslot_for_area(&initial, &layout.timeslot_levels).ok_or(
            ExtractError::TimeSlotNotFound {
                weekday,
                edge: SlotEdge::Start,
            },
        )?;
        let end = timeslot_for_area(&merged, &layout.timeslot_levels).ok_or(
            ExtractError::TimeSlotNotFound {
                weekday,
                edge: SlotEdge::End,
            },
        )?;

        let text = page.extract_text(&merged).unwrap_or_else(|| {
            log::warn!("{weekday} {start}: no text found in module cell");
            String::new()
        });

        modules.push(RawExtractedModule {
            weekday,
            start_seconds: start.start_seconds(),
            end_seconds: end.end_seconds(),
            text,
            source_page_number: page_number,
        });
    }

    Ok(modules)
}
