use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{LECTURER_SHORTHAND_SIZE, LECTURER_TABLE_SETTINGS, RASTER_DPI};
use crate::core::model::{ClassPdfExtractionPageData, Lecturer, ModuleRecord};
use crate::document::bridge::LayoutBridge;
use crate::document::renderer::PageRenderer;
use crate::document::{DocumentSource, PdfDocument};
use crate::export::{read_json, Exporter, JsonExporter};
use crate::extract::extract_pages;
use crate::parse::{extract_lecturers, load_lecturer_directory, LecturerDirectory};
use crate::stitch::{build_module_records, resolve_metadata};

const DEFAULT_LAYOUT_SCRIPT: &str = "scripts/dump_layout.py";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub jobs: usize,
    pub lecturers: Option<PathBuf>,
    pub save_intermediate: Option<PathBuf>,
    pub load_intermediate: Option<PathBuf>,
    pub layout_script: PathBuf,
    pub dpi: u32,
    /// Keeps rendered page images here; a scratch directory otherwise.
    pub work_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            jobs: 1,
            lecturers: None,
            save_intermediate: None,
            load_intermediate: None,
            layout_script: PathBuf::from(DEFAULT_LAYOUT_SCRIPT),
            dpi: RASTER_DPI,
            work_dir: None,
        }
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_lecturers(mut self, path: Option<PathBuf>) -> Self {
        self.lecturers = path;
        self
    }

    pub fn with_save_intermediate(mut self, path: Option<PathBuf>) -> Self {
        self.save_intermediate = path;
        self
    }

    pub fn with_load_intermediate(mut self, path: Option<PathBuf>) -> Self {
        self.load_intermediate = path;
        self
    }

    pub fn with_layout_script(mut self, path: PathBuf) -> Self {
        self.layout_script = path;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_work_dir(mut self, dir: PathBuf) -> Self {
        self.work_dir = Some(dir);
        self
    }
}

/// What a `classes` run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassesOutcome {
    /// Extraction stopped after metadata and was written here.
    Intermediate(PathBuf),
    Records(Vec<ModuleRecord>),
}

pub fn open_class_pdf(config: &PipelineConfig) -> Result<PdfDocument> {
    let bridge = LayoutBridge::new(config.layout_script.clone());
    let renderer = match &config.work_dir {
        Some(dir) => PageRenderer::new(dir.join("pages"), config.dpi),
        None => PageRenderer::scratch(config.dpi).context("could not create a render directory")?,
    };
    Ok(PdfDocument::new(config.input.clone(), bridge, renderer))
}

pub fn open_lecturer_pdf(config: &PipelineConfig) -> PdfDocument {
    let bridge = LayoutBridge::new(config.layout_script.clone())
        .with_table_settings(LECTURER_TABLE_SETTINGS.to_string());
    PdfDocument::layout_only(config.input.clone(), bridge)
}

/// Pass 1 in parallel, then page metadata in page order.
pub fn extract_class_pages(
    document: &dyn DocumentSource,
    jobs: usize,
) -> Result<Vec<ClassPdfExtractionPageData>> {
    let raw = extract_pages(document, jobs).context("timetable extraction failed")?;
    let pages = resolve_metadata(raw).context("page metadata could not be resolved")?;
    Ok(pages)
}

fn lecturer_directory(config: &PipelineConfig) -> Option<LecturerDirectory> {
    match &config.lecturers {
        Some(path) => load_lecturer_directory(path),
        None => {
            log::warn!("no lecturer file given, accepting any {LECTURER_SHORTHAND_SIZE}-character shorthand");
            None
        }
    }
}

/// Runs the timetable conversion on `document`, or on the saved
/// intermediate file when one is configured, and writes the output.
pub fn run_classes(config: &PipelineConfig, document: &dyn DocumentSource) -> Result<ClassesOutcome> {
    let pages = match &config.load_intermediate {
        Some(path) => {
            log::info!("loading intermediate extraction from {}", path.display());
            read_json(path)?
        }
        None => extract_class_pages(document, config.jobs)?,
    };

    if let Some(path) = &config.save_intermediate {
        JsonExporter::new(path.clone()).pretty().export(&pages)?;
        return Ok(ClassesOutcome::Intermediate(path.clone()));
    }

    let directory = lecturer_directory(config);
    let records = build_module_records(&pages, directory.as_ref())
        .context("module cells could not be classified")?;
    export_records(&records, &config.output)?;
    Ok(ClassesOutcome::Records(records))
}

pub fn export_records(records: &[ModuleRecord], output: &Path) -> Result<()> {
    JsonExporter::new(output.to_path_buf()).export(records)
}

pub fn run_lecturers(document: &dyn DocumentSource, output: &Path) -> Result<Vec<Lecturer>> {
    let lecturers = extract_lecturers(document).context("lecturer extraction failed")?;
    log::info!("found {} lecturers", lecturers.len());
    JsonExporter::new(output.to_path_buf()).export(&lecturers)?;
    Ok(lecturers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Weekday;
    use crate::document::MemoryDocument;
    use crate::extract::fixtures::TimetableFixture;
    use pretty_assertions::assert_eq;

    fn document() -> MemoryDocument {
        MemoryDocument::new(vec![
            TimetableFixture::new("D3a Data Science")
                .module(Weekday::Tuesday, 0, 1, "mgli\nmmuel\n5.1C43")
                .build(),
            TimetableFixture::new("D3b Data Science").build(),
        ])
    }

    #[test]
    fn writes_records_with_lecturer_directory() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let lecturers = dir.path().join("lecturers.json");
        std::fs::write(&lecturers, r#"[{"short":"mmuell","surname":"Müller","firstname":"Max"}]"#)?;
        let config = PipelineConfig::new(dir.path().join("in.pdf"), dir.path().join("classes.json"))
            .with_jobs(2)
            .with_lecturers(Some(lecturers));

        let ClassesOutcome::Records(records) = run_classes(&config, &document())? else {
            panic!("expected records");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lecturer_shorthands, vec!["mmuell"]);

        let written: Vec<ModuleRecord> = read_json(&config.output)?;
        assert_eq!(written, records);
        Ok(())
    }

    #[test]
    fn intermediate_round_trip_skips_extraction() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let intermediate = dir.path().join("pages.json");
        let output = dir.path().join("classes.json");

        let save = PipelineConfig::new(dir.path().join("in.pdf"), output.clone())
            .with_save_intermediate(Some(intermediate.clone()));
        assert_eq!(
            run_classes(&save, &document())?,
            ClassesOutcome::Intermediate(intermediate.clone())
        );
        assert!(!output.exists());

        let load = PipelineConfig::new(dir.path().join("in.pdf"), output.clone())
            .with_load_intermediate(Some(intermediate));
        let ClassesOutcome::Records(records) = run_classes(&load, &MemoryDocument::default())? else {
            panic!("expected records");
        };
        assert_eq!(records[0].class_name, "D3a");
        assert_eq!(records[0].weekday, Weekday::Tuesday);
        assert!(output.exists());
        Ok(())
    }

    #[test]
    fn class_pdf_renders_into_scratch_unless_work_dir_given() -> Result<()> {
        let config = PipelineConfig::new(PathBuf::from("a.pdf"), PathBuf::from("b.json"));
        assert_eq!(config.work_dir, None);
        assert!(open_class_pdf(&config).is_ok());

        let dir = tempfile::tempdir()?;
        let config = config.with_work_dir(dir.path().to_path_buf());
        assert_eq!(config.work_dir.as_deref(), Some(dir.path()));
        assert!(open_class_pdf(&config).is_ok());
        Ok(())
    }

    #[test]
    fn jobs_are_at_least_one() {
        let config = PipelineConfig::new(PathBuf::from("a.pdf"), PathBuf::from("b.json")).with_jobs(0);
        assert_eq!(config.jobs, 1);
    }
}
