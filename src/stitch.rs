//! Sequential second pass: page metadata, cell classification and
//! de-duplication of modules that appear on several pages.

use std::collections::HashMap;

use crate::core::error::Result;
use crate::core::model::{
    ClassPdfExtractionPageData, ModuleRecord, PageMetadata, RawExtractedModule, RawPageExtraction,
    Weekday,
};
use crate::parse::{parse_above_table_text, parse_module_cell_text, LecturerDirectory};

/// Metadata resolved so far, threaded through the pages in order. Later
/// pages may borrow the degree program of earlier ones.
#[derive(Debug, Clone, Default)]
pub struct MetadataFold {
    previous: Vec<PageMetadata>,
    pages: Vec<ClassPdfExtractionPageData>,
}

impl MetadataFold {
    /// Starts from metadata resolved elsewhere, e.g. an earlier document.
    pub fn with_previous(previous: Vec<PageMetadata>) -> Self {
        Self {
            previous,
            pages: Vec::new(),
        }
    }

    pub fn previous(&self) -> &[PageMetadata] {
        &self.previous
    }

    pub fn push(mut self, raw: RawPageExtraction) -> Result<Self> {
        let page_metadata = parse_above_table_text(&raw.above_table_text, &self.previous)
            .map_err(|err| err.on_page(raw.page_number))?;
        log::debug!(
            "page {}: class {} ({})",
            raw.page_number,
            page_metadata.class_name,
            page_metadata.degree_program
        );

        self.previous.push(page_metadata.clone());
        self.pages.push(ClassPdfExtractionPageData {
            raw_extracted_modules: raw.raw_extracted_modules,
            page_metadata,
        });
        Ok(self)
    }

    pub fn finish(self) -> Vec<ClassPdfExtractionPageData> {
        self.pages
    }
}

/// Resolves every page's metadata, in page order.
pub fn resolve_metadata(raw_pages: Vec<RawPageExtraction>) -> Result<Vec<ClassPdfExtractionPageData>> {
    raw_pages
        .into_iter()
        .try_fold(MetadataFold::default(), MetadataFold::push)
        .map(MetadataFold::finish)
}

/// Class names of all pages, first occurrence order.
pub fn collect_class_names(pages: &[ClassPdfExtractionPageData]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for page in pages {
        let name = &page.page_metadata.class_name;
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

pub fn module_id(
    class_name: &str,
    module_shorthand: &str,
    weekday: Weekday,
    start_seconds: u32,
    end_seconds: u32,
) -> String {
    format!(
        "{class_name}-{module_shorthand}-{}-{start_seconds}-{end_seconds}",
        weekday.index()
    )
}

/// Module records keyed by id. A repeated id only adds its pages.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<ModuleRecord>,
    by_id: HashMap<String, usize>,
}

impl RecordSet {
    pub fn insert(&mut self, record: ModuleRecord) {
        match self.by_id.get(&record.id) {
            Some(&index) => {
                let existing = &mut self.records[index];
                log::debug!("merging duplicate module {} from pages {:?}", record.id, record.pages);
                existing.pages.extend(record.pages);
                existing.pages.sort_unstable();
                existing.pages.dedup();
            }
            None => {
                self.by_id.insert(record.id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ModuleRecord> {
        self.records
    }
}

fn module_record(
    module: &RawExtractedModule,
    metadata: &PageMetadata,
    class_names: &[String],
    lecturers: Option<&LecturerDirectory>,
) -> Result<ModuleRecord> {
    let parsed = parse_module_cell_text(
        &module.text,
        &metadata.class_name,
        metadata.degree_program,
        class_names,
        lecturers,
    )?;

    Ok(ModuleRecord {
        id: module_id(
            &metadata.class_name,
            &parsed.module_shorthand,
            module.weekday,
            module.start_seconds,
            module.end_seconds,
        ),
        weekday: module.weekday,
        module_shorthand: parsed.module_shorthand,
        start_seconds: module.start_seconds,
        end_seconds: module.end_seconds,
        degree_program: parsed.degree_program,
        class_name: metadata.class_name.clone(),
        rooms: parsed.rooms,
        pages: vec![module.source_page_number],
        part_of_other_classes: Vec::new(),
        teaching_type: parsed.teaching_type,
        lecturer_shorthands: parsed.lecturer_shorthands,
    })
}

/// Classifies every module of every page and merges duplicates.
///
/// The class name list is computed over all pages first, since a cell on
/// page 1 may carry the name of a class printed on page 30.
pub fn build_module_records(
    pages: &[ClassPdfExtractionPageData],
    lecturers: Option<&LecturerDirectory>,
) -> Result<Vec<ModuleRecord>> {
    let class_names = collect_class_names(pages);
    let mut records = RecordSet::default();

    for page in pages {
        for module in &page.raw_extracted_modules {
            let record = module_record(module, &page.page_metadata, &class_names, lecturers)
                .map_err(|err| err.on_page(module.source_page_number))?;
            records.insert(record);
        }
    }

    log::info!(
        "{} module records from {} pages and {} classes",
        records.len(),
        pages.len(),
        class_names.len()
    );
    Ok(records.into_records())
}
