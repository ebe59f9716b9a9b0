use crate::config::{MERGE_LINE_TOLERANCE, TOLERANCE};
use crate::core::error::{ExtractError, Result};
use crate::core::geometry::{is_area_below, is_line_at_bottom, vertical_match, Area, HorizontalLine};
use crate::core::model::Weekday;

/// The candidate cells of one weekday column, handed out at most once each.
#[derive(Debug)]
pub struct CellQueue<'a> {
    cells: &'a [Area],
    consumed: Vec<bool>,
}

impl<'a> CellQueue<'a> {
    pub fn new(cells: &'a [Area]) -> Self {
        Self {
            cells,
            consumed: vec![false; cells.len()],
        }
    }

    /// Next unconsumed cell in original order.
    pub fn pop_front(&mut self) -> Option<Area> {
        let index = self.consumed.iter().position(|used| !used)?;
        self.consumed[index] = true;
        Some(self.cells[index])
    }

    /// Takes the first unconsumed cell directly below `reference`.
    pub fn take_below(&mut self, reference: &Area) -> Option<Area> {
        let index = self
            .cells
            .iter()
            .zip(&self.consumed)
            .position(|(cell, used)| !used && is_area_below(cell, reference, TOLERANCE))?;
        self.consumed[index] = true;
        Some(self.cells[index])
    }

    pub fn remaining(&self) -> usize {
        self.consumed.iter().filter(|used| !**used).count()
    }
}

#[derive(Debug)]
enum MergeState {
    Searching(Area),
    Found(Area),
}

/// Grows `initial` downwards through cells that have no separator line
/// between them, until a line or the bottom of the grid closes it.
pub fn merge_vertically_spanning_cells(
    initial: Area,
    queue: &mut CellQueue<'_>,
    horizontal_lines: &[HorizontalLine],
    lowest_y: f32,
    weekday: Weekday,
) -> Result<Area> {
    let mut state = MergeState::Searching(initial);

    loop {
        state = match state {
            MergeState::Found(area) => return Ok(area),
            MergeState::Searching(current) => {
                log::debug!("searching bottom boundary of {current:?} on {weekday}");

                if horizontal_lines
                    .iter()
                    .any(|line| is_line_at_bottom(&current, line, MERGE_LINE_TOLERANCE))
                {
                    log::debug!("bottom boundary: horizontal line");
                    MergeState::Found(current)
                } else if vertical_match(current.y2, lowest_y, TOLERANCE) {
                    log::debug!("bottom boundary: end of table");
                    MergeState::Found(current)
                } else {
                    let next = queue
                        .take_below(&current)
                        .ok_or(ExtractError::NoBottomBoundary { weekday })?;
                    log::debug!("merging with cell below: {next:?}");
                    MergeState::Searching(current.extend_down(&next))
                }
            }
        };
    }
}
