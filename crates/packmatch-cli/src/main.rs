#![allow(
    clippy::too_many_lines,        // CLI main() is necessarily large
    clippy::must_use_candidate,    // CLI functions don't need must_use
)]

//! Packmatch CLI - Artwork export planner
//!
//! Loads an artwork document JSON, normalizes panel-tag names, matches
//! asset-ID labels to panels, renames matched panels to ID-TAG form, and
//! writes an export manifest plus an append-only audit log.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use colored::Colorize;
use packmatch_core::{
    write_report, ArtworkDocument, DocumentSource, DryRunSink, ExportPipeline, FileLogSink,
    JsonDocumentSource, ManifestExportSink, PipelineConfig, RunReport, MANIFEST_FILE_NAME,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if verbose output is requested
    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "packmatch",
    about = "Match asset IDs to artwork panels and plan exports",
    long_about = "Normalize panel-tag names in an artwork document, match asset-ID\n\
                  labels to panels by quadrant and proximity, rename matched panels\n\
                  to ID-TAG form, and write an export manifest plus an audit log.\n\
                  \n\
                  The input is an artwork document JSON carrying a group tree and a\n\
                  flat list of text labels, with geometry in y-up document space.",
    version
)]
struct Args {
    /// Artwork document JSON to process
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Raster scale factor recorded in the manifest (default: 1.0, or from config)
    #[arg(long, value_name = "FACTOR")]
    scale: Option<f64>,

    /// Directory for the export manifest and the default log file
    #[arg(short, long, value_name = "DIR", default_value = "exports")]
    output_dir: PathBuf,

    /// Audit log path (default: <output-dir>/export_assets.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Skip writing the audit log
    #[arg(long, conflicts_with = "log_file")]
    no_log: bool,

    /// Plan the run without writing a manifest
    #[arg(long)]
    preview: bool,

    /// Restrict the run to top-level groups with this exact name
    #[arg(long, value_name = "NAME")]
    group: Option<String>,

    /// Write the renamed document back to this path
    #[arg(long, value_name = "PATH")]
    save_document: Option<PathBuf>,

    /// Pipeline configuration JSON file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the association distance cutoff
    #[arg(long, value_name = "DIST")]
    max_distance: Option<f64>,

    /// Override the ambiguity epsilon
    #[arg(long, value_name = "EPS")]
    tie_epsilon: Option<f64>,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Show per-group results
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

/// Resolve the pipeline configuration with precedence: CLI > config file > defaults
fn load_pipeline_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => PipelineConfig::default(),
    };
    if let Some(scale) = args.scale {
        config = config.with_scale(scale);
    }
    if let Some(max_distance) = args.max_distance {
        config = config.with_max_distance_quadrant(max_distance);
    }
    if let Some(tie_epsilon) = args.tie_epsilon {
        config = config.with_tie_epsilon(tie_epsilon);
    }
    Ok(config)
}

/// Append the run report to the log file, creating parent directories as needed.
fn write_log(path: &Path, report: &RunReport, timestamp: DateTime<Utc>) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create log directory: {}", parent.display())
            })?;
        }
    }
    let mut sink = FileLogSink::append(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    write_report(&mut sink, report, timestamp)
        .with_context(|| format!("Failed to write log file: {}", path.display()))?;
    Ok(())
}

/// Write the renamed document back as pretty-printed JSON.
fn save_document(path: &Path, document: &ArtworkDocument) -> Result<()> {
    let json =
        serde_json::to_string_pretty(document).context("Failed to serialize document")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write document: {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    // Configuration problems are user errors: report and exit before touching
    // the input.
    let config = match load_pipeline_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            std::process::exit(1);
        }
    };
    let pipeline = match ExportPipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            eprintln!(
                "{} Scale and distance thresholds must be positive finite numbers; \
                 check --scale, --max-distance, --tie-epsilon, and the config file",
                "Help:".cyan().bold()
            );
            std::process::exit(1);
        }
    };

    let source = JsonDocumentSource::new(&args.input);
    let mut document = match source.load() {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            if !args.input.exists() {
                eprintln!(
                    "{} Check that the input path is correct and the file exists",
                    "Help:".cyan().bold()
                );
            }
            std::process::exit(1);
        }
    };

    if let Some(name) = &args.group {
        document.groups.retain(|group| &group.name == name);
        if document.groups.is_empty() {
            eprintln!(
                "{} No top-level group named '{name}' in {}",
                "Warning:".yellow().bold(),
                args.input.display()
            );
        }
    }

    // One timestamp for the whole run keeps console lines and the log in step.
    let started_at = Utc::now();

    let run = if args.preview {
        let mut sink = DryRunSink::new(&args.output_dir);
        pipeline.run(&mut document, &mut sink)
    } else {
        let mut sink = match ManifestExportSink::new(&args.output_dir) {
            Ok(sink) => sink,
            Err(e) => {
                eprintln!("{} {e}", "Error:".red().bold());
                std::process::exit(2);
            }
        };
        pipeline.run(&mut document, &mut sink)
    };
    let report = match run {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            std::process::exit(2);
        }
    };

    if verbosity.is_verbose() {
        for record in &report.records {
            let line = record.format_line(started_at);
            match record.status() {
                "MATCHED" => println!("{}", line.green()),
                "EXPORT_FAILED" => println!("{}", line.red()),
                _ => println!("{}", line.yellow()),
            }
        }
    }

    if !args.no_log {
        let log_path = args
            .log_file
            .clone()
            .unwrap_or_else(|| args.output_dir.join("export_assets.log"));
        if let Err(e) = write_log(&log_path, &report, started_at) {
            eprintln!("{} {e:#}", "Error:".red().bold());
            std::process::exit(2);
        }
        if verbosity.is_verbose() {
            eprintln!(
                "{} Audit log appended to: {}",
                "Info:".blue().bold(),
                log_path.display()
            );
        }
    }

    if let Some(path) = &args.save_document {
        if let Err(e) = save_document(path, &document) {
            eprintln!("{} {e:#}", "Error:".red().bold());
            std::process::exit(2);
        }
        if verbosity.should_show_output() {
            eprintln!(
                "{} Renamed document written to: {}",
                "✓".green().bold(),
                path.display()
            );
        }
    }

    if verbosity.should_show_output() {
        if args.preview {
            eprintln!(
                "{} Preview run, no manifest written",
                "Info:".blue().bold()
            );
        } else {
            eprintln!(
                "{} Export manifest written to: {}",
                "✓".green().bold(),
                args.output_dir.join(MANIFEST_FILE_NAME).display()
            );
        }
        let summary = report.summary;
        if summary.unmatched() == 0 && summary.export_failures == 0 {
            eprintln!("{} {summary}", "✓".green().bold());
        } else {
            eprintln!("{} {summary}", "!".yellow().bold());
        }
    }

    Ok(())
}
