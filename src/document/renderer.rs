use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use tempfile::TempDir;

use crate::core::error::{ExtractError, Result};
use crate::document::layout::PageRaster;

/// PDF user space is 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone)]
pub struct PageRenderer {
    out_dir: PathBuf,
    dpi: u32,
    /// Removed with the last clone of the renderer.
    scratch: Option<Arc<TempDir>>,
}

impl PageRenderer {
    /// Renders into `out_dir` and leaves the images there.
    pub fn new(out_dir: PathBuf, dpi: u32) -> Self {
        Self {
            out_dir,
            dpi,
            scratch: None,
        }
    }

    /// Renders into a private temporary directory deleted on drop.
    pub fn scratch(dpi: u32) -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("classplan-pages-").tempdir()?;
        Ok(Self {
            out_dir: dir.path().to_path_buf(),
            dpi,
            scratch: Some(Arc::new(dir)),
        })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn scale(&self) -> f32 {
        self.dpi as f32 / POINTS_PER_INCH
    }

    pub fn render_page(&self, pdf_path: &Path, page_idx: usize) -> Result<PageRaster> {
        fs::create_dir_all(&self.out_dir)?;

        // pdftoppm uses 1-based page indices
        let page_number = page_idx + 1;
        let prefix = self.out_dir.join(format!("page_{:03}", page_number));

        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-singlefile")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-f")
            .arg(page_number.to_string())
            .arg("-l")
            .arg(page_number.to_string())
            .arg(pdf_path)
            .arg(&prefix)
            .status()?;

        if !status.success() {
            return Err(ExtractError::Document(format!(
                "pdftoppm failed with status: {status}"
            )));
        }

        let image_path = prefix.with_extension("png");
        if !image_path.exists() {
            return Err(ExtractError::Document(format!(
                "expected rendered image not found: {}",
                image_path.display()
            )));
        }

        let image = image::open(&image_path)?.to_rgb8();
        log::debug!(
            "rendered page {} at {} dpi: {}x{}",
            page_number,
            self.dpi,
            image.width(),
            image.height()
        );

        Ok(PageRaster {
            image,
            scale: self.scale(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_follows_dpi() {
        let renderer = PageRenderer::new(PathBuf::from("unused"), 144);
        assert_eq!(renderer.scale(), 2.0);
    }

    #[test]
    fn scratch_directory_outlives_clones_only() {
        let renderer = PageRenderer::scratch(72).unwrap();
        let dir = renderer.out_dir().to_path_buf();
        fs::write(dir.join("page_001.png"), b"png").unwrap();

        let clone = renderer.clone();
        drop(renderer);
        assert!(dir.is_dir());

        drop(clone);
        assert!(!dir.exists());
    }

    #[test]
    fn explicit_directory_is_kept() {
        let parent = tempfile::tempdir().unwrap();
        let renderer = PageRenderer::new(parent.path().join("pages"), 72);
        assert_eq!(renderer.out_dir(), parent.path().join("pages"));
        drop(renderer);
        assert!(parent.path().is_dir());
    }
}
