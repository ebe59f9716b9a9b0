//! The lecturer shorthand directory: loading it, matching noisy words
//! against it, and reading it out of the lecturer PDF.

use std::path::Path;

use crate::config::{LECTURER_SEPARATOR_OFFSET, LECTURER_SHORTHAND_SIZE, TOLERANCE};
use crate::core::error::{ExtractError, Result};
use crate::core::geometry::Area;
use crate::core::model::Lecturer;
use crate::document::{DocumentSource, PageSource};

/// Known lecturer shorthands, in directory order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LecturerDirectory {
    shorthands: Vec<String>,
}

/// Outcome of resolving one word against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShorthandMatch {
    Exact(String),
    Prefix(String),
    Ambiguous(Vec<String>),
    Unknown,
}

impl LecturerDirectory {
    pub fn new(shorthands: Vec<String>) -> Self {
        Self { shorthands }
    }

    pub fn len(&self) -> usize {
        self.shorthands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shorthands.is_empty()
    }

    pub fn contains(&self, shorthand: &str) -> bool {
        self.shorthands.iter().any(|s| s == shorthand)
    }

    /// Exact hit first, otherwise the single entry starting with the word
    /// or with the word minus its last character.
    pub fn resolve(&self, word: &str) -> ShorthandMatch {
        if self.contains(word) {
            return ShorthandMatch::Exact(word.to_string());
        }

        let truncated = word
            .char_indices()
            .last()
            .map(|(index, _)| &word[..index])
            .unwrap_or("");

        let candidates: Vec<String> = self
            .shorthands
            .iter()
            .filter(|s| s.starts_with(word) || (!truncated.is_empty() && s.starts_with(truncated)))
            .cloned()
            .collect();

        match candidates.len() {
            0 => ShorthandMatch::Unknown,
            1 => ShorthandMatch::Prefix(candidates.into_iter().next().unwrap_or_default()),
            _ => ShorthandMatch::Ambiguous(candidates),
        }
    }
}

/// Lecturer shorthands named on the second line of a module cell.
///
/// Without a directory every six-character word is taken at face value.
/// Words that cannot be matched are dropped with a warning.
pub fn match_lecturer_shorthands(line: &str, directory: Option<&LecturerDirectory>) -> Vec<String> {
    let mut shorthands = Vec::new();

    for word in line.split_whitespace() {
        let Some(directory) = directory else {
            if word.chars().count() == LECTURER_SHORTHAND_SIZE {
                shorthands.push(word.to_string());
            } else {
                log::warn!("'{word}' is not a lecturer shorthand of length {LECTURER_SHORTHAND_SIZE}");
            }
            continue;
        };

        match directory.resolve(word) {
            ShorthandMatch::Exact(shorthand) => shorthands.push(shorthand),
            ShorthandMatch::Prefix(shorthand) => {
                log::debug!("'{word}' matched lecturer '{shorthand}'");
                shorthands.push(shorthand);
            }
            ShorthandMatch::Ambiguous(candidates) => {
                log::warn!("'{word}' matches several lecturers: {}", candidates.join(", "));
            }
            ShorthandMatch::Unknown => log::warn!("'{word}' matches no known lecturer"),
        }
    }

    shorthands
}

/// Reads the lecturer JSON. Entries without a `short` are skipped; a
/// missing or malformed file only disables directory matching.
pub fn load_lecturer_directory(path: &Path) -> Option<LecturerDirectory> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("could not read lecturer file {}: {err}", path.display());
            return None;
        }
    };
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
        Ok(entries) => entries,
        Err(err) => {
            log::warn!("invalid lecturer file {}: {err}", path.display());
            return None;
        }
    };

    let total = entries.len();
    let shorthands: Vec<String> = entries
        .iter()
        .filter_map(|entry| entry.get("short").and_then(serde_json::Value::as_str))
        .map(str::to_string)
        .collect();
    if shorthands.len() < total {
        log::warn!(
            "skipped {} lecturer entries without a shorthand in {}",
            total - shorthands.len(),
            path.display()
        );
    }
    log::info!("loaded {} lecturers from {}", shorthands.len(), path.display());
    Some(LecturerDirectory::new(shorthands))
}

/// One table row of the lecturer PDF before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLecturer {
    pub shorthand: String,
    pub surname: String,
    pub firstname: String,
}

impl RawLecturer {
    fn is_header(&self) -> bool {
        self.shorthand == "Name" && self.surname == "Nachname" && self.firstname == "Vorname"
    }

    fn is_example(&self) -> bool {
        self.shorthand == "vak" && self.surname.is_empty() && self.firstname.is_empty()
    }
}

/// Column separators and the vertical band holding the table, all taken
/// from the first page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LecturerGrid {
    surname_x: f32,
    firstname_x: f32,
    band: Option<(f32, f32)>,
}

impl LecturerGrid {
    fn from_first_page(page: &dyn PageSource) -> Result<Self> {
        let words = page.words(&Area::new(0.0, 0.0, page.width(), page.height()));
        let header_x = |label: &str| {
            words
                .iter()
                .find(|word| word.text == label)
                .map(|word| word.bbox.x1 - LECTURER_SEPARATOR_OFFSET)
        };
        let (Some(surname_x), Some(firstname_x)) = (header_x("Nachname"), header_x("Vorname")) else {
            return Err(ExtractError::Document(
                "could not find the Nachname/Vorname column headers".to_string(),
            ));
        };
        log::debug!("column separators: {surname_x} (Nachname), {firstname_x} (Vorname)");

        let lines = page.lines();
        let band = if lines.is_empty() {
            log::warn!("first page of the lecturer PDF has no lines");
            None
        } else {
            let top = lines.iter().map(|l| l.top).fold(f32::INFINITY, f32::min);
            let bottom = lines.iter().map(|l| l.bottom).fold(f32::NEG_INFINITY, f32::max);
            Some((top, bottom))
        };

        Ok(Self {
            surname_x,
            firstname_x,
            band,
        })
    }

    fn crop(&self, page: &dyn PageSource) -> Area {
        match self.band {
            Some((top, bottom)) => Area::new(0.0, top, page.width(), bottom),
            None => Area::new(0.0, 0.0, page.width(), page.height()),
        }
    }
}

fn read_lecturer_rows(page: &dyn PageSource, grid: &LecturerGrid) -> Result<Vec<RawLecturer>> {
    let crop = grid.crop(page);
    let band = Area::new(
        crop.x1 - TOLERANCE,
        crop.y1 - TOLERANCE,
        crop.x2 + TOLERANCE,
        crop.y2 + TOLERANCE,
    );
    let tables: Vec<_> = page.tables().iter().filter(|t| band.contains(&t.bbox)).collect();
    let [table] = tables.as_slice() else {
        return Err(ExtractError::Document(format!(
            "expected exactly 1 table in the lecturer PDF, found {}",
            tables.len()
        )));
    };

    let text = |x1: f32, y1: f32, x2: f32, y2: f32| {
        page.extract_text(&Area::new(x1, y1, x2, y2)).unwrap_or_default()
    };

    let mut rows = Vec::new();
    for (row_index, row) in table.rows.iter().enumerate() {
        let cells: Vec<&Area> = row.cells.iter().flatten().collect();
        let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
            log::debug!("row {row_index}: no cells");
            continue;
        };
        let (top, bottom, left, right) = (first.y1, first.y2, first.x1, last.x2);

        let lecturer = RawLecturer {
            shorthand: text(left, top, grid.surname_x, bottom),
            surname: text(grid.surname_x, top, grid.firstname_x, bottom),
            firstname: text(grid.firstname_x, top, right, bottom),
        };
        log::debug!("row {row_index}: {lecturer:?}");
        rows.push(lecturer);
    }
    Ok(rows)
}

/// Reads every row of the lecturer table across all pages.
pub fn extract_raw_lecturers(document: &dyn DocumentSource) -> Result<Vec<RawLecturer>> {
    let page_count = document.page_count()?;
    if page_count == 0 {
        return Err(ExtractError::Document("lecturer PDF has no pages".to_string()));
    }

    let first = document.open_page(0).map_err(|err| err.on_page(1))?;
    let grid = LecturerGrid::from_first_page(first.as_ref()).map_err(|err| err.on_page(1))?;

    let mut rows = read_lecturer_rows(first.as_ref(), &grid).map_err(|err| err.on_page(1))?;
    for index in 1..page_count {
        let page = document.open_page(index).map_err(|err| err.on_page(index + 1))?;
        rows.extend(read_lecturer_rows(page.as_ref(), &grid).map_err(|err| err.on_page(index + 1))?);
    }
    Ok(rows)
}

/// Drops the header and example rows and repeated entries, keeping order.
pub fn parse_lecturers(raw: Vec<RawLecturer>) -> Vec<Lecturer> {
    let mut lecturers: Vec<Lecturer> = Vec::new();
    for row in raw {
        if row.is_header() || row.is_example() {
            log::debug!("skipping lecturer row {row:?}");
            continue;
        }
        let lecturer = Lecturer {
            short: row.shorthand,
            surname: row.surname,
            firstname: row.firstname,
        };
        if lecturers.contains(&lecturer) {
            log::debug!("skipping duplicate lecturer {lecturer:?}");
        } else {
            lecturers.push(lecturer);
        }
    }
    lecturers
}

pub fn extract_lecturers(document: &dyn DocumentSource) -> Result<Vec<Lecturer>> {
    Ok(parse_lecturers(extract_raw_lecturers(document)?))
}
