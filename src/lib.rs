pub mod config;
pub mod core;
pub mod document;
pub mod export;
pub mod extract;
pub mod parse;
pub mod pipeline;
pub mod stitch;

pub use crate::core::error::{ExtractError, Result};
pub use crate::core::model::{ClassPdfExtractionPageData, Lecturer, ModuleRecord, RawPageExtraction};
