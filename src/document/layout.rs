use image::{imageops, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::core::error::{ExtractError, Result};
use crate::core::geometry::Area;
use crate::document::{DocumentSource, PageSource};

/// Vertical distance within which characters share a text line.
const LINE_TOLERANCE: f32 = 3.0;
/// Horizontal gap above which a space is inserted between characters.
const WORD_GAP: f32 = 3.0;

/// Geometry and glyphs of one page as produced by the layout dump.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub tables: Vec<TableLayout>,
    #[serde(default)]
    pub lines: Vec<LineSegment>,
    #[serde(default)]
    pub chars: Vec<CharBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableLayout {
    pub bbox: Area,
    pub rows: Vec<TableRow>,
}

/// A detected row. Cells covered by a span are reported as `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<Option<Area>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LineSegment {
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
}

impl LineSegment {
    pub fn is_horizontal(&self) -> bool {
        self.top == self.bottom
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharBox {
    pub text: String,
    pub x0: f32,
    pub top: f32,
    pub x1: f32,
    pub bottom: f32,
}

impl CharBox {
    fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) * 0.5, (self.top + self.bottom) * 0.5)
    }
}

/// A word of text with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: Area,
}

/// Rendered page pixels with their pixels-per-unit scale.
#[derive(Debug, Clone)]
pub struct PageRaster {
    pub image: RgbImage,
    pub scale: f32,
}

impl PageRaster {
    /// A white page of `width` x `height` units.
    pub fn blank(width: f32, height: f32, scale: f32) -> Self {
        let width = (width * scale).ceil().max(1.0) as u32;
        let height = (height * scale).ceil().max(1.0) as u32;
        Self {
            image: RgbImage::from_pixel(width, height, Rgb([255, 255, 255])),
            scale,
        }
    }

    /// Draft rendering that paints every glyph box solid black on white.
    /// Used when no real rendering of the page is available.
    pub fn from_glyph_boxes(layout: &PageLayout, scale: f32) -> Self {
        let mut raster = Self::blank(layout.width, layout.height, scale);
        for ch in layout.chars.iter().filter(|c| !c.text.trim().is_empty()) {
            raster.fill(&Area::new(ch.x0, ch.top, ch.x1, ch.bottom), Rgb([0, 0, 0]));
        }
        raster
    }

    pub fn fill(&mut self, area: &Area, color: Rgb<u8>) {
        let (width, height) = self.image.dimensions();
        let x0 = (area.x1 * self.scale).floor().max(0.0) as u32;
        let y0 = (area.y1 * self.scale).floor().max(0.0) as u32;
        let x1 = ((area.x2 * self.scale).ceil().max(0.0) as u32).min(width);
        let y1 = ((area.y2 * self.scale).ceil().max(0.0) as u32).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    pub fn crop(&self, area: &Area) -> RgbImage {
        let (width, height) = self.image.dimensions();
        let x0 = ((area.x1 * self.scale).floor().max(0.0) as u32).min(width);
        let y0 = ((area.y1 * self.scale).floor().max(0.0) as u32).min(height);
        let x1 = ((area.x2 * self.scale).ceil().max(0.0) as u32).min(width);
        let y1 = ((area.y2 * self.scale).ceil().max(0.0) as u32).min(height);
        if x1 <= x0 || y1 <= y0 {
            return RgbImage::new(0, 0);
        }
        imageops::crop_imm(&self.image, x0, y0, x1 - x0, y1 - y0).to_image()
    }
}

/// An in-memory page: a layout plus its raster.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    layout: PageLayout,
    raster: PageRaster,
}

impl LayoutPage {
    pub fn new(layout: PageLayout, raster: PageRaster) -> Self {
        Self { layout, raster }
    }

    /// Builds the page with a draft raster painted from its glyph boxes.
    pub fn from_layout(layout: PageLayout, scale: f32) -> Self {
        let raster = PageRaster::from_glyph_boxes(&layout, scale);
        Self { layout, raster }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    fn chars_in(&self, area: &Area) -> Vec<&CharBox> {
        self.layout
            .chars
            .iter()
            .filter(|ch| {
                let (cx, cy) = ch.center();
                area.contains_point(cx, cy)
            })
            .collect()
    }
}

impl PageSource for LayoutPage {
    fn width(&self) -> f32 {
        self.layout.width
    }

    fn height(&self) -> f32 {
        self.layout.height
    }

    fn tables(&self) -> &[TableLayout] {
        &self.layout.tables
    }

    fn lines(&self) -> &[LineSegment] {
        &self.layout.lines
    }

    fn extract_text(&self, area: &Area) -> Option<String> {
        let lines = assemble_lines(self.chars_in(area));
        let text = lines
            .iter()
            .map(|line| line_text(line))
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            None
        } else {
            Some(text.nfc().collect())
        }
    }

    fn words(&self, area: &Area) -> Vec<Word> {
        assemble_lines(self.chars_in(area))
            .iter()
            .flat_map(|line| line_words(line))
            .collect()
    }

    fn rasterize(&self, area: &Area) -> Result<RgbImage> {
        Ok(self.raster.crop(area))
    }
}

/// Clusters characters into lines by their top edge, each line left to right.
fn assemble_lines(mut chars: Vec<&CharBox>) -> Vec<Vec<&CharBox>> {
    chars.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x0.total_cmp(&b.x0)));
    let mut lines: Vec<Vec<&CharBox>> = Vec::new();
    let mut line_top = f32::NEG_INFINITY;
    for ch in chars {
        match lines.last_mut() {
            Some(line) if (ch.top - line_top).abs() <= LINE_TOLERANCE => line.push(ch),
            _ => {
                line_top = ch.top;
                lines.push(vec![ch]);
            }
        }
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.x0.total_cmp(&b.x0));
    }
    lines
}

fn line_text(line: &[&CharBox]) -> String {
    let mut text = String::new();
    let mut prev_x1: Option<f32> = None;
    for ch in line {
        if let Some(x1) = prev_x1 {
            if ch.x0 - x1 > WORD_GAP && !text.ends_with(' ') {
                text.push(' ');
            }
        }
        if ch.text == " " && text.ends_with(' ') {
            continue;
        }
        text.push_str(&ch.text);
        prev_x1 = Some(ch.x1);
    }
    text.trim().to_string()
}

fn line_words(line: &[&CharBox]) -> Vec<Word> {
    let mut words: Vec<Word> = Vec::new();
    let mut current: Option<Word> = None;
    for ch in line {
        if ch.text.trim().is_empty() {
            words.extend(current.take());
            continue;
        }
        let bbox = Area::new(ch.x0, ch.top, ch.x1, ch.bottom);
        match current.as_mut() {
            Some(word) if ch.x0 - word.bbox.x2 <= WORD_GAP => {
                word.text.push_str(&ch.text);
                word.bbox.x2 = word.bbox.x2.max(bbox.x2);
                word.bbox.y1 = word.bbox.y1.min(bbox.y1);
                word.bbox.y2 = word.bbox.y2.max(bbox.y2);
            }
            _ => {
                words.extend(current.take());
                current = Some(Word {
                    text: ch.text.clone(),
                    bbox,
                });
            }
        }
    }
    words.extend(current);
    words
}

/// A document whose pages are already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<LayoutPage>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<LayoutPage>) -> Self {
        Self { pages }
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> Result<usize> {
        Ok(self.pages.len())
    }

    fn open_page(&self, index: usize) -> Result<Box<dyn PageSource>> {
        self.pages
            .get(index)
            .cloned()
            .map(|page| Box::new(page) as Box<dyn PageSource>)
            .ok_or_else(|| ExtractError::Document(format!("page index {index} out of range")))
    }
}
