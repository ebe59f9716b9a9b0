//! Error types for timetable extraction.
//!
//! Every variant is fatal to its unit of work: a page during extraction,
//! the whole run during stitching. Noisy-but-recoverable input is logged
//! instead and never surfaces here.

use crate::core::model::Weekday;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Wraps any failure with the 1-based page it happened on.
    #[error("page {page}: {source}")]
    Page {
        page: usize,
        #[source]
        source: Box<ExtractError>,
    },

    #[error("found {count} tables matching the minimum dimensions, expected at most 1")]
    AmbiguousTable { count: usize },

    #[error("no tables found on page")]
    NoTable,

    #[error("incomplete table layout: {0}")]
    IncompleteLayout(String),

    #[error("no bottom boundary or next cell found for module on {weekday}")]
    NoBottomBoundary { weekday: Weekday },

    #[error("could not determine {edge} timeslot for module on {weekday}")]
    TimeSlotNotFound { weekday: Weekday, edge: SlotEdge },

    #[error("expected 3 lines of text above the table, found {0}")]
    HeaderLineCount(usize),

    #[error("could not determine semester: {0}")]
    Semester(String),

    #[error("could not determine export timestamp: {0}")]
    Timestamp(String),

    #[error("no valid degree program found in line '{0}'")]
    DegreeProgram(String),

    #[error("expected 2 or 3 lines in module cell text, found {0}")]
    CellLineCount(usize),

    #[error("module shorthand is empty after stripping class names from '{0}'")]
    EmptyModuleShorthand(String),

    #[error("document error: {0}")]
    Document(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl ExtractError {
    pub fn on_page(self, page: usize) -> Self {
        match self {
            ExtractError::Page { .. } => self,
            other => ExtractError::Page {
                page,
                source: Box::new(other),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEdge {
    Start,
    End,
}

impl std::fmt::Display for SlotEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotEdge::Start => f.write_str("start"),
            SlotEdge::End => f.write_str("end"),
        }
    }
}
