//! pngscope CLI - PNG structural forensics from the command line.
//!
//! This is the main entry point for the pngscope command-line application.

mod inputs;
mod render;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pngscope::prelude::*;
use pngscope::png::decompress::DEFAULT_MAX_OUTPUT;
use pngscope::strings::{DEFAULT_MIN_LENGTH, DEFAULT_PREVIEW_COUNT};

use crate::inputs::expand_inputs;

/// pngscope - PNG structural forensics tool
#[derive(Parser)]
#[command(name = "pngscope")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk chunks, decode image data, survey strings and extract trailing data
    Analyze {
        #[command(flatten)]
        batch: BatchArgs,

        #[command(flatten)]
        survey: SurveyArgs,

        /// Upper bound on decompressed image data, in bytes
        #[arg(long, env = "PNGSCOPE_MAX_DECOMPRESSED", default_value_t = DEFAULT_MAX_OUTPUT)]
        max_decompressed: usize,

        /// Directory for extracted artifacts (default: next to each input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Do not search for or save trailing data
        #[arg(long)]
        no_extract: bool,
    },

    /// List chunks, IHDR fields and text chunks
    Chunks {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Survey printable strings in raw file bytes
    Strings {
        #[command(flatten)]
        batch: BatchArgs,

        #[command(flatten)]
        survey: SurveyArgs,
    },

    /// Save bytes appended after the IEND record
    Extract {
        #[command(flatten)]
        batch: BatchArgs,

        /// Directory for extracted artifacts (default: next to each input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct BatchArgs {
    /// Input files, directories (scanned for *.png) or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Emit a JSON report on stdout
    #[arg(long)]
    json: bool,

    /// Process files in parallel
    #[arg(short, long)]
    parallel: bool,

    /// Worker threads for --parallel (default: one per core)
    #[arg(short, long, requires = "parallel")]
    jobs: Option<usize>,
}

#[derive(Args)]
struct SurveyArgs {
    /// Minimum printable run length
    #[arg(short, long, env = "PNGSCOPE_MIN_LENGTH", default_value_t = DEFAULT_MIN_LENGTH,
          value_parser = parse_min_length)]
    min_length: usize,

    /// Keyword to filter runs by, case-insensitive (repeatable or comma-separated)
    #[arg(short, long = "keyword", env = "PNGSCOPE_KEYWORDS", value_delimiter = ',')]
    keywords: Vec<String>,

    /// Runs to show when no keyword matched
    #[arg(long, default_value_t = DEFAULT_PREVIEW_COUNT)]
    preview: usize,
}

fn parse_min_length(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

impl SurveyArgs {
    fn options(&self) -> SurveyOptions {
        SurveyOptions::default()
            .with_min_length(self.min_length)
            .with_keywords(&self.keywords)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let unreadable = match cli.command {
        Commands::Analyze {
            batch,
            survey,
            max_decompressed,
            output_dir,
            no_extract,
        } => {
            let options = AnalysisOptions {
                survey: survey.options(),
                limits: DecodeLimits::with_max_output(max_decompressed),
                preview_count: survey.preview,
                extract_trailing: !no_extract,
                output_dir,
                ..AnalysisOptions::default()
            };
            cmd_analyze(&batch, &options)?
        }
        Commands::Chunks { batch } => cmd_chunks(&batch)?,
        Commands::Strings { batch, survey } => cmd_strings(&batch, &survey)?,
        Commands::Extract { batch, output_dir } => cmd_extract(&batch, output_dir)?,
    };

    Ok(if unreadable > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_inputs(batch: &BatchArgs) -> Result<Vec<PathBuf>> {
    if let Some(jobs) = batch.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    let paths = expand_inputs(&batch.inputs)?;
    if paths.is_empty() {
        anyhow::bail!("No input files");
    }
    debug!(count = paths.len(), "inputs resolved");
    Ok(paths)
}

fn progress_bar(len: usize, json: bool) -> Result<ProgressBar> {
    if json || len < 2 {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    println!("{}", text);
    Ok(())
}

fn cmd_analyze(batch: &BatchArgs, options: &AnalysisOptions) -> Result<usize> {
    let paths = resolve_inputs(batch)?;
    let pb = progress_bar(paths.len(), batch.json)?;

    let start = Instant::now();
    let report = if batch.parallel {
        pngscope::analyze_batch_parallel(&paths, options, |_| pb.inc(1))
    } else {
        pngscope::analyze_batch_with(&paths, options, |_| pb.inc(1))
    };
    pb.finish_and_clear();
    info!(files = paths.len(), elapsed = ?start.elapsed(), "analysis complete");

    if batch.json {
        print_json(&report)?;
    } else {
        for file in &report.files {
            render::print_file_report(file);
        }
        render::print_batch_summary(&report);
    }

    Ok(report.files.iter().filter(|f| f.is_unreadable()).count())
}

fn cmd_chunks(batch: &BatchArgs) -> Result<usize> {
    let paths = resolve_inputs(batch)?;
    let limits = DecodeLimits::default();
    let mut listings = Vec::new();
    let mut unreadable = 0;

    for path in &paths {
        let walker = match ChunkWalker::open(path, RetainPolicy::Metadata) {
            Ok(walker) => walker,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                if matches!(e, pngscope::png::Error::Io(_)) {
                    unreadable += 1;
                }
                listings.push(json!({ "path": path, "error": e.to_string() }));
                continue;
            }
        };

        let summary = WalkSummary::collect(walker, limits);
        if batch.json {
            listings.push(json!({
                "path": path,
                "chunks": summary.chunks,
                "ihdr": summary.ihdr,
                "texts": summary.texts,
                "stop": summary.stop,
                "end_offset": summary.end_offset,
            }));
        } else {
            render::print_chunk_listing(
                path,
                &summary.chunks,
                summary.ihdr.as_ref(),
                &summary.texts,
                &summary.stop,
            );
        }
    }

    if batch.json {
        print_json(&listings)?;
    }
    Ok(unreadable)
}

fn cmd_strings(batch: &BatchArgs, args: &SurveyArgs) -> Result<usize> {
    let paths = resolve_inputs(batch)?;
    let options = args.options();
    let pb = progress_bar(paths.len(), batch.json)?;
    let mut results = Vec::new();
    let mut unreadable = 0;

    for path in &paths {
        pb.inc(1);
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                pb.suspend(|| eprintln!("Error reading {}: {}", path.display(), e));
                unreadable += 1;
                results.push(json!({ "path": path, "error": e.to_string() }));
                continue;
            }
        };

        let result = survey(&data, &options, args.preview);
        if batch.json {
            results.push(json!({ "path": path, "strings": result }));
        } else {
            pb.suspend(|| render::print_strings(path, &result));
        }
    }
    pb.finish_and_clear();

    if batch.json {
        print_json(&results)?;
    }
    Ok(unreadable)
}

fn cmd_extract(batch: &BatchArgs, output_dir: Option<PathBuf>) -> Result<usize> {
    let paths = resolve_inputs(batch)?;
    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let mut results = Vec::new();
    let mut unreadable = 0;

    for path in &paths {
        let trailing = match extract_to_artifact(path, output_dir.as_deref()) {
            Ok(extraction) => TrailingReport::from(extraction),
            Err(e) => {
                if matches!(e, pngscope::trailer::Error::Io(_)) {
                    unreadable += 1;
                }
                TrailingReport::Failed { error: (&e).into() }
            }
        };

        if batch.json {
            results.push(json!({ "path": path, "trailing": trailing }));
        } else {
            println!("== {}", path.display());
            render::print_trailing(path, &trailing);
        }
    }

    if batch.json {
        print_json(&results)?;
    }
    Ok(unreadable)
}
