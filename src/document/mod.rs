pub mod bridge;
pub mod layout;
pub mod pdf;
pub mod reader;
pub mod renderer;

pub use layout::{LayoutPage, MemoryDocument, PageLayout, PageRaster};
pub use pdf::PdfDocument;

use image::RgbImage;

use crate::core::error::Result;
use crate::core::geometry::Area;
use layout::{LineSegment, TableLayout, Word};

/// What the extraction core needs from one decoded page.
pub trait PageSource {
    fn width(&self) -> f32;

    fn height(&self) -> f32;

    /// Tables found on the page, in detection order.
    fn tables(&self) -> &[TableLayout];

    fn lines(&self) -> &[LineSegment];

    /// Plain text inside `area`, or `None` when the region holds no glyphs.
    fn extract_text(&self, area: &Area) -> Option<String>;

    fn words(&self, area: &Area) -> Vec<Word>;

    fn rasterize(&self, area: &Area) -> Result<RgbImage>;
}

/// A multi-page document. Pages are opened independently so that parallel
/// workers never share a decoder.
pub trait DocumentSource: Sync {
    fn page_count(&self) -> Result<usize>;

    fn open_page(&self, index: usize) -> Result<Box<dyn PageSource>>;
}
