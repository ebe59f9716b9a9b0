use crate::config::{MIXED_ROOM_SENTINEL, ONLINE_MARKER};
use crate::core::error::{ExtractError, Result};
use crate::core::model::{DegreeProgram, ParsedModuleCellTextData, TeachingType};
use crate::parse::lecturers::{match_lecturer_shorthands, LecturerDirectory};

/// Splits a module cell into shorthand, lecturers and, when present, the
/// room line.
///
/// ```text
/// mgli D3a          module shorthand (class name may be glued on)
/// mmuell fmeier     lecturer shorthands
/// 5.1C43 Online     rooms and teaching mode (optional)
/// ```
pub fn parse_module_cell_text(
    text: &str,
    class_name: &str,
    degree_program: DegreeProgram,
    class_names: &[String],
    lecturers: Option<&LecturerDirectory>,
) -> Result<ParsedModuleCellTextData> {
    log::debug!("parsing module cell text: {text:?}");
    let lines: Vec<&str> = text.split('\n').collect();

    let (first, second, third) = match lines.as_slice() {
        [first, second] => (*first, *second, None),
        [first, second, third] => (*first, *second, Some(*third)),
        _ => return Err(ExtractError::CellLineCount(lines.len())),
    };

    let module_shorthand = module_shorthand(first, class_name, class_names)?;
    let (rooms, teaching_type) = match third {
        Some(line) => (rooms(line), teaching_type(line)),
        None => (Vec::new(), TeachingType::OnSite),
    };

    Ok(ParsedModuleCellTextData {
        degree_program: remap_mixed_program(degree_program, &module_shorthand),
        module_shorthand,
        rooms,
        teaching_type,
        lecturer_shorthands: match_lecturer_shorthands(second, lecturers),
    })
}

/// First token of the line. A lone token may have the class name glued to
/// its end, so prefixes of the page's class and then of every other class
/// are stripped from it.
pub fn module_shorthand(line: &str, class_name: &str, class_names: &[String]) -> Result<String> {
    let mut words = line.split_whitespace();
    let first = words.next().unwrap_or("");

    let mut shorthand = first;
    if words.next().is_none() {
        shorthand = strip_class_suffix(shorthand, class_name);
        for other in class_names.iter().filter(|other| *other != class_name) {
            shorthand = strip_class_suffix(shorthand, other);
        }
    }

    if shorthand.is_empty() {
        return Err(ExtractError::EmptyModuleShorthand(line.to_string()));
    }
    Ok(shorthand.to_string())
}

/// Removes the longest non-empty prefix of `class_name` that ends `word`.
fn strip_class_suffix<'a>(word: &'a str, class_name: &str) -> &'a str {
    let boundaries = class_name
        .char_indices()
        .map(|(index, _)| index)
        .skip(1)
        .chain(std::iter::once(class_name.len()));
    let longest_first: Vec<usize> = boundaries.collect();

    for end in longest_first.into_iter().rev() {
        let prefix = &class_name[..end];
        if let Some(stripped) = word.strip_suffix(prefix) {
            return stripped;
        }
    }
    word
}

/// Pages listing the mixed context classes carry modules of three programs.
pub fn remap_mixed_program(degree_program: DegreeProgram, module_shorthand: &str) -> DegreeProgram {
    if degree_program != DegreeProgram::MixedContext {
        return degree_program;
    }
    match module_shorthand {
        "bplan" | "lean" => DegreeProgram::ContextBusiness,
        "wisa" | "aua" => DegreeProgram::ContextCommunication,
        _ => DegreeProgram::ContextHumanities,
    }
}

pub fn rooms(line: &str) -> Vec<String> {
    if line.contains(MIXED_ROOM_SENTINEL) {
        return Vec::new();
    }
    line.split_whitespace().map(str::to_string).collect()
}

pub fn teaching_type(line: &str) -> TeachingType {
    if line.contains(ONLINE_MARKER) {
        TeachingType::Online
    } else {
        TeachingType::OnSite
    }
}
