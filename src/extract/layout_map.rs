use crate::core::error::{ExtractError, Result};
use crate::core::geometry::{Area, HorizontalLine, YLevel};
use crate::core::model::{TimeSlot, Weekday};
use crate::document::layout::TableLayout;
use crate::document::PageSource;

/// Where each weekday column and each time slot row sits on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLayoutMap {
    pub weekday_areas: Vec<(Weekday, Area)>,
    pub timeslot_levels: Vec<(TimeSlot, YLevel)>,
}

impl TableLayoutMap {
    pub fn weekday_area(&self, weekday: Weekday) -> Option<&Area> {
        self.weekday_areas
            .iter()
            .find(|(day, _)| *day == weekday)
            .map(|(_, area)| area)
    }

    /// Bottom edge of the last time slot, the lower boundary of the grid.
    pub fn lowest_y(&self) -> Option<f32> {
        let last = TimeSlot::last();
        self.timeslot_levels
            .iter()
            .find(|(slot, _)| *slot == last)
            .map(|(_, level)| level.y2)
    }
}

/// Candidate cells and separator lines of one weekday column, before
/// vertical spans are resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnmergedTimeEntries {
    pub cells: Vec<Area>,
    pub horizontal_lines: Vec<HorizontalLine>,
}

/// Reads the header row for weekday columns and the first column for time
/// slot rows.
///
/// Weekday areas only learn their bottom edge once the last time slot row
/// is seen, so a table that never reaches it is rejected here instead of
/// silently producing columns that match nothing.
pub fn map_table_layout(page: &dyn PageSource, table: &TableLayout) -> Result<TableLayoutMap> {
    let mut rows = table.rows.iter();
    let header = rows
        .next()
        .ok_or_else(|| ExtractError::IncompleteLayout("table has no rows".to_string()))?;

    let mut weekday_areas = collect_weekday_areas(page, &header.cells);
    let missing: Vec<&str> = Weekday::ALL
        .iter()
        .zip(&weekday_areas)
        .filter(|(_, area)| area.is_none())
        .map(|(day, _)| day.display_name())
        .collect();
    if !missing.is_empty() {
        return Err(ExtractError::IncompleteLayout(format!(
            "weekday headers not found: {}",
            missing.join(", ")
        )));
    }

    let catalog = TimeSlot::catalog();
    let mut timeslot_levels = Vec::with_capacity(catalog.len());
    let mut expected = 0usize;

    for (row_index, row) in rows.enumerate() {
        let row_number = row_index + 1;
        let Some(target) = catalog.get(expected) else {
            log::debug!("row {row_number} below the last time slot ignored");
            continue;
        };
        let Some(cell) = row.cells.first().copied().flatten() else {
            log::warn!("row {row_number}: missing time slot cell, not collecting its y level");
            continue;
        };
        let text = page.extract_text(&cell).unwrap_or_default();
        if !(text.contains(target.start_time) && text.contains(target.end_time)) {
            log::warn!("row {row_number}: unexpected time slot text '{text}', expected {target}");
            continue;
        }

        if *target == TimeSlot::last() {
            for area in weekday_areas.iter_mut().flatten() {
                area.y2 = cell.y2;
            }
        }
        timeslot_levels.push((*target, YLevel { y1: cell.y1, y2: cell.y2 }));
        expected += 1;
    }

    if expected < catalog.len() {
        return Err(ExtractError::IncompleteLayout(format!(
            "last time slot never reached, stopped at {}",
            catalog[expected]
        )));
    }

    Ok(TableLayoutMap {
        weekday_areas: Weekday::ALL
            .iter()
            .zip(weekday_areas)
            .filter_map(|(day, area)| area.map(|area| (*day, area)))
            .collect(),
        timeslot_levels,
    })
}

/// Weekday columns start at the bottom of their header cell; the bottom
/// edge stays 0 until the last time slot is known.
fn collect_weekday_areas(page: &dyn PageSource, cells: &[Option<Area>]) -> Vec<Option<Area>> {
    let mut areas: Vec<Option<Area>> = vec![None; Weekday::ALL.len()];
    for (column, cell) in cells.iter().enumerate() {
        let Some(cell) = cell else {
            log::debug!("header column {column}: no cell");
            continue;
        };
        let text = page.extract_text(cell).unwrap_or_default();
        if let Some(weekday) = Weekday::from_display_name(&text) {
            log::debug!("header column {column}: {weekday}");
            areas[weekday.index()] = Some(Area::new(cell.x1, cell.y2, cell.x2, 0.0));
        }
    }
    areas
}

/// Gathers, per weekday, every table cell inside its column and every
/// horizontal line drawn within it.
pub fn collect_unmerged_time_entries(
    page: &dyn PageSource,
    table: &TableLayout,
    layout: &TableLayoutMap,
) -> Vec<(Weekday, UnmergedTimeEntries)> {
    layout
        .weekday_areas
        .iter()
        .map(|(weekday, target)| {
            let cells: Vec<Area> = table
                .rows
                .iter()
                .flat_map(|row| row.cells.iter().flatten())
                .filter(|cell| target.contains(cell))
                .copied()
                .collect();

            let horizontal_lines: Vec<HorizontalLine> = page
                .lines()
                .iter()
                .filter(|line| line.is_horizontal())
                .filter(|line| target.x1 <= line.x0 && target.x2 >= line.x1)
                .map(|line| HorizontalLine {
                    x1: line.x0,
                    x2: line.x1,
                    y: line.bottom,
                })
                .collect();

            log::debug!(
                "{weekday}: {} cells, {} separator lines",
                cells.len(),
                horizontal_lines.len()
            );
            (
                *weekday,
                UnmergedTimeEntries {
                    cells,
                    horizontal_lines,
                },
            )
        })
        .collect()
}
