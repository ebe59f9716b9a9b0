//! Fixed constants of the timetable format.

/// Default tolerance (page units) for vertical edge matching.
pub const TOLERANCE: f32 = 3.0;

/// Separator lines are often drawn a little off the cell box, so the merger
/// looks for them with a wider tolerance than [`TOLERANCE`].
pub const MERGE_LINE_TOLERANCE: f32 = 20.0;

/// Length of a lecturer shorthand when no directory is available.
pub const LECTURER_SHORTHAND_SIZE: usize = 6;

/// Minimum width and height of the timetable table. Legend tables are smaller.
pub const MIN_TABLE_DIMENSION: f32 = 400.0;

pub const WHITISH_MIN_CHANNEL: u8 = 250;
pub const WHITISH_MAX_SPREAD: u8 = 25;
pub const EMPTY_AREA_RATIO: f32 = 0.9;

/// Resolution used when rasterizing cells for the emptiness check.
pub const RASTER_DPI: u32 = 150;

/// Room text marking a mixed room assignment; such cells carry no room list.
pub const MIXED_ROOM_SENTINEL: &str = "DSMixe";

pub const ONLINE_MARKER: &str = "Online";

/// Column separators of the lecturer table sit this far left of the
/// "Nachname"/"Vorname" header words.
pub const LECTURER_SEPARATOR_OFFSET: f32 = 2.0;

/// The lecturer table has no vertical rules between its columns.
pub const LECTURER_TABLE_SETTINGS: &str = r#"{"vertical_strategy": "text", "horizontal_strategy": "lines", "snap_tolerance": 3}"#;

pub const CLASS_PDF_INPUT_FILE: &str = "klassen.pdf";
pub const CLASSES_JSON_OUTPUT_FILE: &str = "classes.json";
pub const LECTURER_PDF_INPUT_FILE: &str = "lecturers.pdf";
pub const LECTURERS_JSON_OUTPUT_FILE: &str = "lecturers.json";

/// Every row of the timetable, in order. Two short breaks sit between
/// 18:00/18:05 and 19:35/19:45.
pub const ALLOWED_TIMESLOTS: [(&str, &str); 14] = [
    ("8:15", "9:00"),
    ("9:15", "10:00"),
    ("10:15", "11:00"),
    ("11:15", "12:00"),
    ("12:15", "13:00"),
    ("13:15", "14:00"),
    ("14:15", "15:00"),
    ("15:15", "16:00"),
    ("16:15", "17:00"),
    ("17:15", "18:00"),
    ("18:05", "18:50"),
    ("18:50", "19:35"),
    ("19:45", "20:30"),
    ("20:30", "21:15"),
];
