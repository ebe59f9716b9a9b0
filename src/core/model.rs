use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::ALLOWED_TIMESLOTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

const WEEKDAY_NAMES: [(Weekday, &str); 7] = [
    (Weekday::Monday, "Montag"),
    (Weekday::Tuesday, "Dienstag"),
    (Weekday::Wednesday, "Mittwoch"),
    (Weekday::Thursday, "Donnerstag"),
    (Weekday::Friday, "Freitag"),
    (Weekday::Saturday, "Samstag"),
    (Weekday::Sunday, "Sonntag"),
];

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Header text of the day's column in the timetable.
    pub fn display_name(self) -> &'static str {
        WEEKDAY_NAMES[self.index()].1
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Exact match against the column header text.
    pub fn from_display_name(text: &str) -> Option<Self> {
        WEEKDAY_NAMES
            .iter()
            .find(|(_, name)| *name == text)
            .map(|(day, _)| *day)
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for Weekday {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index() as u8)
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u8::deserialize(deserializer)?;
        Weekday::from_index(index as usize)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid weekday index {index}")))
    }
}

/// One row of the timetable. Identity is the pair of clock strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub start_time: &'static str,
    pub end_time: &'static str,
}

const TIMESLOT_CATALOG: [TimeSlot; ALLOWED_TIMESLOTS.len()] = {
    let mut slots = [TimeSlot {
        start_time: "",
        end_time: "",
    }; ALLOWED_TIMESLOTS.len()];
    let mut i = 0;
    while i < ALLOWED_TIMESLOTS.len() {
        slots[i] = TimeSlot {
            start_time: ALLOWED_TIMESLOTS[i].0,
            end_time: ALLOWED_TIMESLOTS[i].1,
        };
        i += 1;
    }
    slots
};

impl TimeSlot {
    pub fn catalog() -> &'static [TimeSlot] {
        &TIMESLOT_CATALOG
    }

    pub fn last() -> TimeSlot {
        TIMESLOT_CATALOG[TIMESLOT_CATALOG.len() - 1]
    }

    pub fn start_seconds(&self) -> u32 {
        clock_seconds(self.start_time)
    }

    pub fn end_seconds(&self) -> u32 {
        clock_seconds(self.end_time)
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}

/// Seconds since midnight of an "H:MM" clock string.
const fn clock_seconds(clock: &str) -> u32 {
    let bytes = clock.as_bytes();
    let mut hours = 0u32;
    let mut minutes = 0u32;
    let mut past_colon = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b':' {
            past_colon = true;
        } else if b.is_ascii_digit() {
            let digit = (b - b'0') as u32;
            if past_colon {
                minutes = minutes * 10 + digit;
            } else {
                hours = hours * 10 + digit;
            }
        }
        i += 1;
    }
    hours * 3600 + minutes * 60
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeProgram {
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Elektro- und Informationstechnik")]
    ElectricalAndInformationEngineering,
    #[serde(rename = "Energie- und Umwelttechnik")]
    EnergyAndEnvironmentalEngineering,
    #[serde(rename = "iCompetence")]
    ICompetence,
    #[serde(rename = "Informatik")]
    ComputerScience,
    #[serde(rename = "Kontext BWL")]
    ContextBusiness,
    #[serde(rename = "Kontext Englisch")]
    ContextEnglish,
    #[serde(rename = "Kontext GSW")]
    ContextHumanities,
    #[serde(rename = "Kontext Kommunikation")]
    ContextCommunication,
    #[serde(rename = "Mixed BWL, GSW, Kommunikation")]
    MixedContext,
    #[serde(rename = "Maschinenbau")]
    MechanicalEngineering,
    #[serde(rename = "Systemtechnik")]
    SystemsEngineering,
    #[serde(rename = "Wirtschaftsingenieurwesen")]
    IndustrialEngineering,
    /// Classes shared across programs.
    #[serde(rename = "agnostic")]
    Agnostic,
}

const DEGREE_PROGRAM_NAMES: [(DegreeProgram, &str); 14] = [
    (DegreeProgram::DataScience, "Data Science"),
    (
        DegreeProgram::ElectricalAndInformationEngineering,
        "Elektro- und Informationstechnik",
    ),
    (
        DegreeProgram::EnergyAndEnvironmentalEngineering,
        "Energie- und Umwelttechnik",
    ),
    (DegreeProgram::ICompetence, "iCompetence"),
    (DegreeProgram::ComputerScience, "Informatik"),
    (DegreeProgram::ContextBusiness, "Kontext BWL"),
    (DegreeProgram::ContextEnglish, "Kontext Englisch"),
    (DegreeProgram::ContextHumanities, "Kontext GSW"),
    (DegreeProgram::ContextCommunication, "Kontext Kommunikation"),
    (DegreeProgram::MixedContext, "Mixed BWL, GSW, Kommunikation"),
    (DegreeProgram::MechanicalEngineering, "Maschinenbau"),
    (DegreeProgram::SystemsEngineering, "Systemtechnik"),
    (DegreeProgram::IndustrialEngineering, "Wirtschaftsingenieurwesen"),
    (DegreeProgram::Agnostic, "agnostic"),
];

impl DegreeProgram {
    /// Programs with their canonical names, in matching order.
    pub fn catalog() -> &'static [(DegreeProgram, &'static str)] {
        &DEGREE_PROGRAM_NAMES
    }

    pub fn name(self) -> &'static str {
        DEGREE_PROGRAM_NAMES
            .iter()
            .find(|(program, _)| *program == self)
            .map(|(_, name)| *name)
            .unwrap_or("agnostic")
    }
}

impl std::fmt::Display for DegreeProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemesterType {
    #[serde(rename = "HS")]
    Autumn,
    #[serde(rename = "FS")]
    Spring,
}

impl SemesterType {
    pub fn marker(self) -> &'static str {
        match self {
            SemesterType::Autumn => "Herbstsemester",
            SemesterType::Spring => "Frühlingssemester",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Semester {
    pub yyyy: u32,
    pub semester_type: SemesterType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Date {
    pub yyyy: u32,
    pub mm: u32,
    pub dd: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub hh: u32,
    pub mm: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTimestamp {
    pub date: Date,
    pub time: Time,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub semester: Semester,
    pub export_timestamp: ExportTimestamp,
    pub class_name: String,
    pub degree_program: DegreeProgram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeachingType {
    OnSite,
    Online,
    Hybrid,
    #[serde(rename = "blockmodule")]
    Block,
}

/// One page-local observation of a module in the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExtractedModule {
    pub weekday: Weekday,
    pub start_seconds: u32,
    pub end_seconds: u32,
    pub text: String,
    pub source_page_number: usize,
}

/// Output of the geometric pass for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPageExtraction {
    pub page_number: usize,
    pub raw_extracted_modules: Vec<RawExtractedModule>,
    pub above_table_text: String,
}

/// A page with its metadata resolved; this is also the intermediate file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPdfExtractionPageData {
    pub raw_extracted_modules: Vec<RawExtractedModule>,
    pub page_metadata: PageMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModuleCellTextData {
    pub module_shorthand: String,
    pub degree_program: DegreeProgram,
    pub rooms: Vec<String>,
    pub teaching_type: TeachingType,
    pub lecturer_shorthands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub weekday: Weekday,
    #[serde(rename = "name")]
    pub module_shorthand: String,
    #[serde(rename = "from")]
    pub start_seconds: u32,
    #[serde(rename = "to")]
    pub end_seconds: u32,
    #[serde(rename = "degree_prg")]
    pub degree_program: DegreeProgram,
    #[serde(rename = "class")]
    pub class_name: String,
    pub rooms: Vec<String>,
    pub pages: Vec<usize>,
    pub part_of_other_classes: Vec<String>,
    pub id: String,
    pub teaching_type: TeachingType,
    #[serde(rename = "teachers")]
    pub lecturer_shorthands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecturer {
    pub short: String,
    pub surname: String,
    pub firstname: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_is_strictly_ordered() {
        let slots = TimeSlot::catalog();
        assert_eq!(slots.len(), 14);
        for pair in slots.windows(2) {
            assert!(pair[0].start_seconds() < pair[0].end_seconds());
            assert!(pair[0].end_seconds() <= pair[1].start_seconds());
        }
        assert_eq!(slots[0].start_seconds(), 8 * 3600 + 15 * 60);
        assert_eq!(TimeSlot::last().end_seconds(), 21 * 3600 + 15 * 60);
    }

    #[test]
    fn weekday_lookup_by_display_name() {
        assert_eq!(Weekday::from_display_name("Mittwoch"), Some(Weekday::Wednesday));
        assert_eq!(Weekday::from_display_name("mittwoch"), None);
        assert_eq!(Weekday::Sunday.index(), 6);
    }

    #[test]
    fn module_record_uses_export_field_names() {
        let record = ModuleRecord {
            weekday: Weekday::Tuesday,
            module_shorthand: "mgli".to_string(),
            start_seconds: 29700,
            end_seconds: 36000,
            degree_program: DegreeProgram::DataScience,
            class_name: "D3a".to_string(),
            rooms: vec!["5.1C43".to_string()],
            pages: vec![1],
            part_of_other_classes: vec![],
            id: "D3a-mgli-1-29700-36000".to_string(),
            teaching_type: TeachingType::OnSite,
            lecturer_shorthands: vec!["mmuell".to_string()],
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["weekday"], 1);
        assert_eq!(value["name"], "mgli");
        assert_eq!(value["from"], 29700);
        assert_eq!(value["degree_prg"], "Data Science");
        assert_eq!(value["class"], "D3a");
        assert_eq!(value["teaching_type"], "on_site");
        assert_eq!(value["teachers"][0], "mmuell");
    }
}
