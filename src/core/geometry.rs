use serde::{Deserialize, Serialize};

use crate::core::model::TimeSlot;

/// Rectangle in page coordinates, y growing downwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Area {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Area {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.x1 <= other.x1 && self.y1 <= other.y1 && self.x2 >= other.x2 && self.y2 >= other.y2
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.x1 <= x && x <= self.x2 && self.y1 <= y && y <= self.y2
    }

    /// Grows the area down to `below`, taking its right edge as well so a
    /// slightly misaligned lower cell widens the result.
    pub fn extend_down(&self, below: &Self) -> Self {
        Self {
            x1: self.x1,
            y1: self.y1,
            x2: below.x2,
            y2: below.y2,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HorizontalLine {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

/// Vertical extent of one time slot row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct YLevel {
    pub y1: f32,
    pub y2: f32,
}

pub fn vertical_match(y1: f32, y2: f32, tolerance: f32) -> bool {
    (y1 - y2).abs() <= tolerance
}

/// Half-open overlap of the x spans `[x1, x2)`.
pub fn horizontal_overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    a.0 < b.1 && a.1 > b.0
}

pub fn is_line_at_bottom(area: &Area, line: &HorizontalLine, tolerance: f32) -> bool {
    vertical_match(line.y, area.y2, tolerance)
        && horizontal_overlap((line.x1, line.x2), (area.x1, area.x2))
}

/// True if `candidate` starts where `reference` ends and the two share
/// some horizontal extent.
pub fn is_area_below(candidate: &Area, reference: &Area, tolerance: f32) -> bool {
    vertical_match(candidate.y1, reference.y2, tolerance)
        && horizontal_overlap((candidate.x1, candidate.x2), (reference.x1, reference.x2))
}

/// Finds the slot whose row contains the bottom edge of `area`.
///
/// Only `y2` is tested, for start and end lookups alike; callers pass the
/// unmerged cell for the start and the merged area for the end.
pub fn timeslot_for_area(area: &Area, ylevels: &[(TimeSlot, YLevel)]) -> Option<TimeSlot> {
    ylevels
        .iter()
        .find(|(_, level)| level.y1 < area.y2 && area.y2 <= level.y2)
        .map(|(slot, _)| *slot)
}
