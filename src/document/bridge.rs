use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::error::{ExtractError, Result};
use crate::document::layout::PageLayout;

/// Runs the external layout dump and reads one page's layout from its
/// JSON output.
#[derive(Debug, Clone)]
pub struct LayoutBridge {
    interpreter: String,
    script_path: PathBuf,
    table_settings: Option<String>,
}

impl LayoutBridge {
    pub fn new(script_path: PathBuf) -> Self {
        Self {
            interpreter: "python3".to_string(),
            script_path,
            table_settings: None,
        }
    }

    /// Table detection settings passed through as a JSON object.
    pub fn with_table_settings(mut self, settings: String) -> Self {
        self.table_settings = Some(settings);
        self
    }

    pub fn run(&self, pdf_path: &Path, page_idx: usize) -> Result<PageLayout> {
        let mut command = Command::new(&self.interpreter);
        command
            .arg(&self.script_path)
            .arg("--pdf")
            .arg(pdf_path)
            .arg("--page")
            .arg(page_idx.to_string());
        if let Some(settings) = &self.table_settings {
            command.arg("--table-settings").arg(settings);
        }

        let output = command.output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Document(format!(
                "layout dump failed for page {}: {stderr}",
                page_idx + 1
            )));
        }

        let layout: PageLayout = serde_json::from_slice(&output.stdout)?;
        log::debug!(
            "page {}: {} tables, {} lines, {} chars",
            page_idx + 1,
            layout.tables.len(),
            layout.lines.len(),
            layout.chars.len()
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dump_with_missing_cells() {
        let json = r#"{
            "width": 842.0,
            "height": 595.0,
            "tables": [{
                "bbox": {"x1": 10.0, "y1": 20.0, "x2": 800.0, "y2": 560.0},
                "rows": [{"cells": [{"x1": 10.0, "y1": 20.0, "x2": 60.0, "y2": 40.0}, null]}]
            }],
            "lines": [{"x0": 10.0, "top": 40.0, "x1": 800.0, "bottom": 40.0}]
        }"#;
        let layout: PageLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.tables[0].rows[0].cells.len(), 2);
        assert!(layout.tables[0].rows[0].cells[1].is_none());
        assert!(layout.lines[0].is_horizontal());
        assert!(layout.chars.is_empty());
    }
}
