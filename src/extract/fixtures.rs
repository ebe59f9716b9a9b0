//! Synthetic timetable pages for unit tests.

use image::Rgb;

use crate::core::geometry::Area;
use crate::core::model::{TimeSlot, Weekday};
use crate::document::layout::{CharBox, LineSegment, PageLayout, TableLayout, TableRow};
use crate::document::{LayoutPage, PageRaster};

pub const TABLE_X: f32 = 50.0;
pub const TIME_WIDTH: f32 = 60.0;
pub const DAY_WIDTH: f32 = 100.0;
pub const HEADER_TOP: f32 = 100.0;
pub const HEADER_HEIGHT: f32 = 20.0;
pub const ROW_HEIGHT: f32 = 30.0;

const CHAR_STEP: f32 = 4.0;
const CHAR_WIDTH: f32 = 3.5;
const CHAR_HEIGHT: f32 = 7.0;
const LINE_STEP: f32 = 9.0;
const MODULE_FILL: Rgb<u8> = Rgb([200, 225, 255]);

pub fn day_x(day: usize) -> f32 {
    TABLE_X + TIME_WIDTH + day as f32 * DAY_WIDTH
}

/// Top of the n-th row below the header, assuming no extra rows.
pub fn row_top(row: usize) -> f32 {
    HEADER_TOP + HEADER_HEIGHT + row as f32 * ROW_HEIGHT
}

pub fn row_bottom(row: usize) -> f32 {
    row_top(row) + ROW_HEIGHT
}

pub fn text_chars(text: &str, x: f32, top: f32) -> Vec<CharBox> {
    text.lines()
        .enumerate()
        .flat_map(|(line, content)| {
            let line_top = top + line as f32 * LINE_STEP;
            content.chars().enumerate().map(move |(i, c)| CharBox {
                text: c.to_string(),
                x0: x + i as f32 * CHAR_STEP,
                top: line_top,
                x1: x + i as f32 * CHAR_STEP + CHAR_WIDTH,
                bottom: line_top + CHAR_HEIGHT,
            })
        })
        .collect()
}

#[derive(Debug, Clone)]
struct FixtureModule {
    weekday: Weekday,
    first_slot: usize,
    last_slot: usize,
    text: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RowKind {
    Slot(usize),
    Extra,
}

#[derive(Debug, Clone)]
pub struct TimetableFixture {
    header: [String; 3],
    day_headers: Vec<String>,
    garbled_slot: Option<usize>,
    extra_after: Option<usize>,
    modules: Vec<FixtureModule>,
}

impl TimetableFixture {
    pub fn new(class_line: &str) -> Self {
        Self {
            header: [
                "Stundenplan Herbstsemester 2024".to_string(),
                "Exportiert am 12.09.2024 14:32".to_string(),
                class_line.to_string(),
            ],
            day_headers: Weekday::ALL
                .iter()
                .map(|day| day.display_name().to_string())
                .collect(),
            garbled_slot: None,
            extra_after: None,
            modules: Vec::new(),
        }
    }

    pub fn header_lines(mut self, lines: [&str; 3]) -> Self {
        self.header = lines.map(str::to_string);
        self
    }

    pub fn rename_day_header(mut self, weekday: Weekday, text: &str) -> Self {
        self.day_headers[weekday.index()] = text.to_string();
        self
    }

    pub fn garble_time_label(mut self, slot: usize) -> Self {
        self.garbled_slot = Some(slot);
        self
    }

    /// Inserts a row with a non-time label below the given slot.
    pub fn extra_row_after(mut self, slot: usize) -> Self {
        self.extra_after = Some(slot);
        self
    }

    /// A module covering `first_slot..=last_slot`, with no separator line
    /// between its rows.
    pub fn module(mut self, weekday: Weekday, first_slot: usize, last_slot: usize, text: &str) -> Self {
        self.modules.push(FixtureModule {
            weekday,
            first_slot,
            last_slot,
            text: text.to_string(),
        });
        self
    }

    fn rows(&self) -> Vec<RowKind> {
        let mut rows = Vec::new();
        for slot in 0..TimeSlot::catalog().len() {
            rows.push(RowKind::Slot(slot));
            if self.extra_after == Some(slot) {
                rows.push(RowKind::Extra);
            }
        }
        rows
    }

    fn spans_past(&self, weekday: Weekday, slot: usize) -> bool {
        self.modules
            .iter()
            .any(|m| m.weekday == weekday && m.first_slot <= slot && slot < m.last_slot)
    }

    pub fn build(&self) -> LayoutPage {
        let rows = self.rows();
        let grid_top = HEADER_TOP + HEADER_HEIGHT;
        let grid_bottom = grid_top + rows.len() as f32 * ROW_HEIGHT;
        let table_right = day_x(Weekday::ALL.len());
        let width = table_right + 50.0;
        let height = grid_bottom + 80.0;

        let mut chars = Vec::new();
        for (i, line) in self.header.iter().enumerate() {
            chars.extend(text_chars(line, TABLE_X, 20.0 + i as f32 * 15.0));
        }

        let mut table_rows = Vec::new();
        let mut header_cells = vec![Some(Area::new(TABLE_X, HEADER_TOP, day_x(0), grid_top))];
        for (day, name) in self.day_headers.iter().enumerate() {
            header_cells.push(Some(Area::new(day_x(day), HEADER_TOP, day_x(day + 1), grid_top)));
            chars.extend(text_chars(name, day_x(day) + 5.0, HEADER_TOP + 5.0));
        }
        table_rows.push(TableRow { cells: header_cells });

        let mut lines = Vec::new();
        for day in 0..=Weekday::ALL.len() {
            lines.push(LineSegment {
                x0: day_x(day),
                top: HEADER_TOP,
                x1: day_x(day),
                bottom: grid_bottom,
            });
        }
        for day in 0..Weekday::ALL.len() {
            lines.push(hline(day, grid_top));
        }

        let mut slot_tops = vec![0.0; TimeSlot::catalog().len()];
        for (visual, kind) in rows.iter().enumerate() {
            let top = grid_top + visual as f32 * ROW_HEIGHT;
            let bottom = top + ROW_HEIGHT;
            let time_cell = Area::new(TABLE_X, top, day_x(0), bottom);
            let label = match *kind {
                RowKind::Slot(slot) if self.garbled_slot == Some(slot) => "--:--".to_string(),
                RowKind::Slot(slot) => {
                    let ts = TimeSlot::catalog()[slot];
                    format!("{} - {}", ts.start_time, ts.end_time)
                }
                RowKind::Extra => "Pause".to_string(),
            };
            chars.extend(text_chars(&label, TABLE_X + 2.0, top + 5.0));

            let mut cells = vec![Some(time_cell)];
            for (day, weekday) in Weekday::ALL.iter().enumerate() {
                cells.push(Some(Area::new(day_x(day), top, day_x(day + 1), bottom)));
                let keep_open = matches!(kind, RowKind::Slot(slot) if self.spans_past(*weekday, *slot));
                if !keep_open {
                    lines.push(hline(day, bottom));
                }
            }
            table_rows.push(TableRow { cells });

            if let RowKind::Slot(slot) = kind {
                slot_tops[*slot] = top;
            }
        }

        let mut raster = PageRaster::blank(width, height, 1.0);
        for module in &self.modules {
            let day = module.weekday.index();
            let top = slot_tops[module.first_slot];
            let bottom = slot_tops[module.last_slot] + ROW_HEIGHT;
            raster.fill(&Area::new(day_x(day), top, day_x(day + 1), bottom), MODULE_FILL);
            chars.extend(text_chars(&module.text, day_x(day) + 2.0, top + 2.0));
        }

        let layout = PageLayout {
            width,
            height,
            tables: vec![
                TableLayout {
                    bbox: Area::new(TABLE_X, HEADER_TOP, table_right, grid_bottom),
                    rows: table_rows,
                },
                TableLayout {
                    bbox: Area::new(TABLE_X, grid_bottom + 20.0, TABLE_X + 150.0, grid_bottom + 50.0),
                    rows: vec![TableRow {
                        cells: vec![Some(Area::new(TABLE_X, grid_bottom + 20.0, TABLE_X + 150.0, grid_bottom + 50.0))],
                    }],
                },
            ],
            lines,
            chars: chars.clone(),
        };

        for ch in chars.iter().filter(|c| !c.text.trim().is_empty()) {
            raster.fill(&Area::new(ch.x0, ch.top, ch.x1, ch.bottom), Rgb([0, 0, 0]));
        }
        LayoutPage::new(layout, raster)
    }
}

fn hline(day: usize, y: f32) -> LineSegment {
    LineSegment {
        x0: day_x(day),
        top: y,
        x1: day_x(day + 1),
        bottom: y,
    }
}
