use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::error::{ExtractError, Result};

#[derive(Debug, Clone)]
pub struct PdfReader {
    path: PathBuf,
}

impl PdfReader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn page_count(&self) -> Result<usize> {
        get_page_count(&self.path)
    }
}

fn get_page_count(pdf_path: &Path) -> Result<usize> {
    let output = Command::new("pdfinfo").arg(pdf_path).output()?;

    if !output.status.success() {
        return Err(ExtractError::Document(format!(
            "pdfinfo failed on {} with status: {}",
            pdf_path.display(),
            output.status
        )));
    }

    parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        ExtractError::Document(format!(
            "pdfinfo output did not contain a 'Pages:' line for {}",
            pdf_path.display()
        ))
    })
}

fn parse_page_count(pdfinfo_output: &str) -> Option<usize> {
    pdfinfo_output
        .lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|rest| rest.trim().parse().ok())
}
