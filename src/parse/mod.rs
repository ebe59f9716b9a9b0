//! Text classification: header metadata, module cells and lecturers.

pub mod cell_text;
pub mod header;
pub mod lecturers;

pub use cell_text::parse_module_cell_text;
pub use header::parse_above_table_text;
pub use lecturers::{extract_lecturers, load_lecturer_directory, LecturerDirectory};
