use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::document::bridge::LayoutBridge;
use crate::document::layout::LayoutPage;
use crate::document::reader::PdfReader;
use crate::document::renderer::PageRenderer;
use crate::document::{DocumentSource, PageSource};

/// A PDF on disk. Every opened page runs its own layout dump and render.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    path: PathBuf,
    reader: PdfReader,
    bridge: LayoutBridge,
    renderer: Option<PageRenderer>,
}

impl PdfDocument {
    pub fn new(path: PathBuf, bridge: LayoutBridge, renderer: PageRenderer) -> Self {
        Self {
            reader: PdfReader::new(path.clone()),
            path,
            bridge,
            renderer: Some(renderer),
        }
    }

    /// Skips rendering; pages get a draft raster painted from their glyphs.
    pub fn layout_only(path: PathBuf, bridge: LayoutBridge) -> Self {
        Self {
            reader: PdfReader::new(path.clone()),
            path,
            bridge,
            renderer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentSource for PdfDocument {
    fn page_count(&self) -> Result<usize> {
        self.reader.page_count()
    }

    fn open_page(&self, index: usize) -> Result<Box<dyn PageSource>> {
        let layout = self.bridge.run(&self.path, index)?;
        let page = match &self.renderer {
            Some(renderer) => LayoutPage::new(layout, renderer.render_page(&self.path, index)?),
            None => LayoutPage::from_layout(layout, 1.0),
        };
        Ok(Box::new(page))
    }
}
