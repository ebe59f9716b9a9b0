//! Metadata from the three lines printed above each timetable.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{ExtractError, Result};
use crate::core::model::{
    Date, DegreeProgram, ExportTimestamp, PageMetadata, Semester, SemesterType, Time,
};

lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").unwrap();
    static ref SHORT_SEMESTER_PATTERN: Regex = Regex::new(r"(?:HS|FS)(\d{2})\b").unwrap();
}

/// Every one of these must appear for a page listing the mixed context classes.
const MIXED_CONTEXT_MARKERS: [&str; 3] = ["Kontext BWL", "Kommunikation", "GSW"];

/// Parses the text above the table. `previous` holds the metadata of the
/// pages before this one and is consulted when the degree program is not
/// printed.
pub fn parse_above_table_text(text: &str, previous: &[PageMetadata]) -> Result<PageMetadata> {
    let lines: Vec<&str> = text.split('\n').collect();
    let [semester_line, timestamp_line, class_line] = lines.as_slice() else {
        return Err(ExtractError::HeaderLineCount(lines.len()));
    };

    let semester = Semester {
        yyyy: semester_year(semester_line)?,
        semester_type: semester_type(semester_line)?,
    };
    let export_timestamp = export_timestamp(timestamp_line)?;
    let class_name = class_name(class_line);
    let degree_program = degree_program(class_line, &class_name, previous)?;

    Ok(PageMetadata {
        semester,
        export_timestamp,
        class_name,
        degree_program,
    })
}

pub fn semester_type(line: &str) -> Result<SemesterType> {
    let autumn = line.contains(SemesterType::Autumn.marker());
    let spring = line.contains(SemesterType::Spring.marker());
    match (autumn, spring) {
        (true, false) => Ok(SemesterType::Autumn),
        (false, true) => Ok(SemesterType::Spring),
        _ => Err(ExtractError::Semester(format!(
            "expected exactly one of '{}' or '{}' in '{line}'",
            SemesterType::Autumn.marker(),
            SemesterType::Spring.marker()
        ))),
    }
}

/// The first run of four digits, else a two-digit year after "HS"/"FS".
pub fn semester_year(line: &str) -> Result<u32> {
    let mut run = 0;
    for (index, ch) in line.char_indices() {
        if ch.is_ascii_digit() {
            run += 1;
            if run == 4 {
                let start = index + 1 - 4;
                return line[start..=index]
                    .parse()
                    .map_err(|_| ExtractError::Semester(format!("invalid year in '{line}'")));
            }
        } else {
            run = 0;
        }
    }

    SHORT_SEMESTER_PATTERN
        .captures(line)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .map(|yy| 2000 + yy)
        .ok_or_else(|| ExtractError::Semester(format!("no year found in '{line}'")))
}

pub fn export_timestamp(line: &str) -> Result<ExportTimestamp> {
    let caps = DATE_PATTERN
        .captures(line)
        .ok_or_else(|| ExtractError::Timestamp(format!("no date in '{line}'")))?;
    let field = |i: usize| -> Result<u32> {
        caps[i]
            .parse()
            .map_err(|_| ExtractError::Timestamp(format!("invalid date in '{line}'")))
    };
    let date = Date {
        dd: field(1)?,
        mm: field(2)?,
        yyyy: field(3)?,
    };

    Ok(ExportTimestamp {
        date,
        time: clock_time(line)?,
    })
}

/// Two characters either side of the first colon that has room for them,
/// padding spaces allowed.
fn clock_time(line: &str) -> Result<Time> {
    let chars: Vec<char> = line.chars().collect();
    let colon = chars
        .iter()
        .enumerate()
        .position(|(i, ch)| *ch == ':' && i >= 2 && i + 2 < chars.len())
        .ok_or_else(|| ExtractError::Timestamp(format!("no time in '{line}'")))?;

    let number = |digits: &[char]| -> Result<u32> {
        digits
            .iter()
            .collect::<String>()
            .trim()
            .parse()
            .map_err(|_| ExtractError::Timestamp(format!("invalid time in '{line}'")))
    };
    Ok(Time {
        hh: number(&chars[colon - 2..colon])?,
        mm: number(&chars[colon + 1..colon + 3])?,
    })
}

/// "- Name with spaces" keeps everything after the dash, otherwise the
/// first word is the class name.
pub fn class_name(line: &str) -> String {
    if let Some(rest) = line.strip_prefix("- ") {
        return rest.to_string();
    }
    match line.split_once(' ') {
        Some((first, _)) => first.to_string(),
        None => line.to_string(),
    }
}

pub fn degree_program(
    line: &str,
    class_name: &str,
    previous: &[PageMetadata],
) -> Result<DegreeProgram> {
    log::debug!("class name: '{class_name}'");

    if MIXED_CONTEXT_MARKERS.iter().all(|marker| line.contains(marker)) {
        return Ok(DegreeProgram::MixedContext);
    }

    if let Some((program, _)) = DegreeProgram::catalog()
        .iter()
        .find(|(_, name)| line.contains(name))
    {
        return Ok(*program);
    }

    log::warn!("guessing the degree program of '{line}'");
    program_from_previous_pages(class_name, previous)
        .or_else(|| program_from_class_name(class_name))
        .ok_or_else(|| ExtractError::DegreeProgram(line.to_string()))
}

/// Sibling classes ("D3a" after "D3", "D3bb" after "D3b...") share the
/// program of the page they follow.
fn program_from_previous_pages(class_name: &str, previous: &[PageMetadata]) -> Option<DegreeProgram> {
    let chars: Vec<char> = class_name.chars().collect();
    let without_last: String = chars.iter().take(chars.len().saturating_sub(1)).collect();

    if !chars.is_empty() {
        if let Some(page) = previous.iter().find(|page| page.class_name == without_last) {
            return Some(page.degree_program);
        }
    }

    if chars.len() >= 2 && chars[chars.len() - 1] == chars[chars.len() - 2] {
        let stem: String = chars[..chars.len() - 2].iter().collect();
        if let Some(page) = previous.iter().find(|page| page.class_name.contains(&stem)) {
            return Some(page.degree_program);
        }
    }

    None
}

fn program_from_class_name(class_name: &str) -> Option<DegreeProgram> {
    let chars: Vec<char> = class_name.chars().collect();
    let slice = |from: usize, to: usize| -> Option<String> {
        (chars.len() >= to).then(|| chars[from..to].iter().collect())
    };

    match chars.get(1) {
        Some('D') => return Some(DegreeProgram::DataScience),
        Some('I') => return Some(DegreeProgram::ComputerScience),
        _ => {}
    }
    if slice(1, 3).as_deref() == Some("iC") {
        return Some(DegreeProgram::ICompetence);
    }
    if class_name == "alle" || slice(1, 4).as_deref() == Some("MSE") {
        return Some(DegreeProgram::Agnostic);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn metadata(class_name: &str, degree_program: DegreeProgram) -> PageMetadata {
        PageMetadata {
            semester: Semester {
                yyyy: 2024,
                semester_type: SemesterType::Autumn,
            },
            export_timestamp: ExportTimestamp {
                date: Date { yyyy: 2024, mm: 9, dd: 12 },
                time: Time { hh: 14, mm: 32 },
            },
            class_name: class_name.to_string(),
            degree_program,
        }
    }

    #[test]
    fn parses_full_header() {
        let text = "Stundenplan Herbstsemester 2024\nExportiert am 12.09.2024 14:32\nD3a Data Science";
        let parsed = parse_above_table_text(text, &[]).unwrap();
        assert_eq!(parsed, metadata("D3a", DegreeProgram::DataScience));
    }

    #[test]
    fn rejects_wrong_line_count() {
        let err = parse_above_table_text("HS24 Herbstsemester\n1.2.2024 10:00", &[]).unwrap_err();
        assert!(matches!(err, ExtractError::HeaderLineCount(2)));
    }

    #[test]
    fn semester_from_short_form() {
        assert_eq!(semester_year("HS24 Herbstsemester").unwrap(), 2024);
        assert_eq!(semester_type("HS24 Herbstsemester").unwrap(), SemesterType::Autumn);
        assert_eq!(semester_year("Frühlingssemester 20251").unwrap(), 2025);
    }

    #[test]
    fn semester_type_must_be_unique() {
        assert!(semester_type("Semesterplan 2024").is_err());
        assert!(semester_type("Herbstsemester und Frühlingssemester").is_err());
        assert_eq!(semester_type("Frühlingssemester 2025").unwrap(), SemesterType::Spring);
    }

    #[test]
    fn timestamp_with_short_date() {
        let ts = export_timestamp("Stand 3.4.2025, 09:05 Uhr").unwrap();
        assert_eq!(ts.date, Date { yyyy: 2025, mm: 4, dd: 3 });
        assert_eq!(ts.time, Time { hh: 9, mm: 5 });

        let ts = export_timestamp("Exportiert am 12.09.2024 9:05").unwrap();
        assert_eq!(ts.date, Date { yyyy: 2024, mm: 9, dd: 12 });
        assert_eq!(ts.time, Time { hh: 9, mm: 5 });
    }

    #[test]
    fn timestamp_requires_date_and_time() {
        assert!(export_timestamp("Stand 14:32").is_err());
        assert!(export_timestamp("Stand 12.09.2024").is_err());
        assert!(export_timestamp("12.09.2024 ab:cd").is_err());
    }

    #[test]
    fn extracts_class_names() {
        assert_eq!(class_name("D3Ia Klassenname Data Science"), "D3Ia");
        assert_eq!(class_name("- Sonderklasse rest"), "Sonderklasse rest");
        assert_eq!(class_name("alle"), "alle");
    }

    #[test]
    fn mixed_context_needs_all_markers() {
        let line = "K1 Kontext BWL, Kontext Kommunikation, Kontext GSW";
        assert_eq!(degree_program(line, "K1", &[]).unwrap(), DegreeProgram::MixedContext);
        // only two of three markers: falls through to the catalog
        let line = "K1 Kontext BWL, Kommunikation";
        assert_eq!(degree_program(line, "K1", &[]).unwrap(), DegreeProgram::ContextBusiness);
    }

    #[test]
    fn catalog_order_decides() {
        assert_eq!(
            degree_program("E1 Elektro- und Informationstechnik", "E1", &[]).unwrap(),
            DegreeProgram::ElectricalAndInformationEngineering
        );
    }

    #[test]
    fn program_from_sibling_class() {
        let previous = vec![metadata("M2", DegreeProgram::MechanicalEngineering)];
        assert_eq!(
            degree_program("M2b", "M2b", &previous).unwrap(),
            DegreeProgram::MechanicalEngineering
        );

        let previous = vec![metadata("S1ab", DegreeProgram::SystemsEngineering)];
        assert_eq!(
            degree_program("S1aa", "S1aa", &previous).unwrap(),
            DegreeProgram::SystemsEngineering
        );
    }

    #[test]
    fn program_from_class_name_shape() {
        assert_eq!(degree_program("3Dx", "3Dx", &[]).unwrap(), DegreeProgram::DataScience);
        assert_eq!(degree_program("2Ib", "2Ib", &[]).unwrap(), DegreeProgram::ComputerScience);
        assert_eq!(degree_program("1iCa", "1iCa", &[]).unwrap(), DegreeProgram::ICompetence);
        assert_eq!(degree_program("alle", "alle", &[]).unwrap(), DegreeProgram::Agnostic);
        assert_eq!(degree_program("xMSE1", "xMSE1", &[]).unwrap(), DegreeProgram::Agnostic);
        assert!(degree_program("Q", "Q", &[]).is_err());
    }
}
