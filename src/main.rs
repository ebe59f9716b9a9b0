use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use classplan::config::{
    CLASSES_JSON_OUTPUT_FILE, CLASS_PDF_INPUT_FILE, LECTURERS_JSON_OUTPUT_FILE,
    LECTURER_PDF_INPUT_FILE, RASTER_DPI,
};
use classplan::document::reader::PdfReader;
use classplan::pipeline::{
    open_class_pdf, open_lecturer_pdf, run_classes, run_lecturers, ClassesOutcome, PipelineConfig,
};

#[derive(Parser, Debug)]
#[command(name = "classplan")]
#[command(version, about = "Class timetable PDF to JSON module records", long_about = None)]
struct Cli {
    /// Log verbosity, overridden by RUST_LOG
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert the class timetable PDF into module records
    Classes {
        /// Input PDF file path
        #[arg(short, long, default_value = CLASS_PDF_INPUT_FILE)]
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = CLASSES_JSON_OUTPUT_FILE)]
        output: PathBuf,

        /// Lecturer directory JSON used to correct lecturer shorthands
        #[arg(short, long)]
        lecturers: Option<PathBuf>,

        /// Pages extracted in parallel
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,

        /// Write the extracted pages with their metadata here and stop
        #[arg(long, conflicts_with = "load_intermediate")]
        save_intermediate: Option<PathBuf>,

        /// Skip the PDF and classify a previously saved extraction
        #[arg(long)]
        load_intermediate: Option<PathBuf>,

        /// Layout dump script run for every page
        #[arg(long, default_value = "scripts/dump_layout.py")]
        layout_script: PathBuf,

        /// Rendering DPI for the emptiness check
        #[arg(long, default_value_t = RASTER_DPI)]
        dpi: u32,

        /// Keep rendered page images in this directory
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// Convert the lecturer shorthand PDF into the lecturer directory
    Lecturers {
        #[arg(short, long, default_value = LECTURER_PDF_INPUT_FILE)]
        input: PathBuf,

        #[arg(short, long, default_value = LECTURERS_JSON_OUTPUT_FILE)]
        output: PathBuf,

        #[arg(long, default_value = "scripts/dump_layout.py")]
        layout_script: PathBuf,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.filter()))
        .init();

    match cli.command {
        Commands::Classes {
            input,
            output,
            lecturers,
            jobs,
            save_intermediate,
            load_intermediate,
            layout_script,
            dpi,
            work_dir,
        } => {
            let mut config = PipelineConfig::new(input, output)
                .with_jobs(jobs)
                .with_lecturers(lecturers)
                .with_save_intermediate(save_intermediate)
                .with_load_intermediate(load_intermediate)
                .with_layout_script(layout_script)
                .with_dpi(dpi);
            if let Some(dir) = work_dir {
                config = config.with_work_dir(dir);
            }
            convert_classes(&config)
        }
        Commands::Lecturers {
            input,
            output,
            layout_script,
        } => convert_lecturers(input, output, layout_script),
        Commands::Info { input } => show_info(input),
    }
}

fn require_file(input: &Path) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }
    Ok(())
}

fn convert_classes(config: &PipelineConfig) -> Result<()> {
    if config.load_intermediate.is_none() {
        require_file(&config.input)?;
    }

    let document = open_class_pdf(config)?;
    log::info!("processing {}", document.path().display());

    let outcome = run_classes(config, &document)
        .with_context(|| format!("Failed to process PDF: {}", config.input.display()))?;

    match outcome {
        ClassesOutcome::Intermediate(path) => {
            log::info!("intermediate extraction saved to {}", path.display());
        }
        ClassesOutcome::Records(records) => {
            log::info!("{} modules written to {}", records.len(), config.output.display());
        }
    }
    Ok(())
}

fn convert_lecturers(input: PathBuf, output: PathBuf, layout_script: PathBuf) -> Result<()> {
    require_file(&input)?;

    let config = PipelineConfig::new(input.clone(), output.clone()).with_layout_script(layout_script);
    let document = open_lecturer_pdf(&config);
    run_lecturers(&document, &output)
        .with_context(|| format!("Failed to process lecturer PDF: {}", input.display()))?;
    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    require_file(&input)?;

    let page_count = PdfReader::new(input.clone())
        .page_count()
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Pages: {}", page_count);

    Ok(())
}
