//! Batch processing command for multiple card photographs.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use lector_core::{Lector, LectorResult, TesseractRecognizer, TextRecognizer};

use super::process::{self, ALLOWED_EXTENSIONS, ErrorResponse, OutputFormat, validate_input};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include the recognized raw text in each output
    #[arg(long)]
    raw_text: bool,

    /// Omit the annotated image from each output
    #[arg(long)]
    no_image: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of one file, kept for the end-of-run summary.
struct FileOutcome {
    path: PathBuf,
    error: Option<ErrorResponse>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = process::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str())
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // One recognizer for the whole batch
    let recognizer = TesseractRecognizer::new(config.ocr.clone())?;
    let lector = Lector::new(recognizer, config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let extension = match args.format {
        OutputFormat::Json => "json",
        OutputFormat::Text => "txt",
    };

    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = read_single_file(&path, &lector);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let error = match outcome {
            Ok(result) => {
                if let Some(ref output_dir) = args.output_dir {
                    let output_name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("dni");
                    let output_path = output_dir.join(format!("{}.{}", output_name, extension));

                    let response = process::build_response(result, args.no_image, args.raw_text);
                    fs::write(&output_path, process::format_response(&response, args.format)?)?;
                    debug!("Wrote output to {}", output_path.display());
                }
                None
            }
            Err(resp) => {
                if !args.continue_on_error {
                    pb.finish_and_clear();
                    anyhow::bail!(
                        "Processing failed for {}: {} ({})",
                        path.display(),
                        resp.error,
                        resp.codigo
                    );
                }
                warn!("Failed to process {}: {}", path.display(), resp.error);
                Some(resp)
            }
        };

        outcomes.push(FileOutcome {
            path,
            error,
            processing_time_ms,
        });
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();
    let ok_count = outcomes.len() - failed.len();

    // Print summary
    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(ok_count).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            let resp = outcome.error.as_ref();
            println!(
                "  - {}: {} ({})",
                outcome.path.display(),
                resp.map(|r| r.error.as_str()).unwrap_or("unknown error"),
                resp.map(|r| r.codigo.as_str()).unwrap_or("INTERNAL_ERROR")
            );
        }
    }

    debug!(
        "per-file timings (ms): {:?}",
        outcomes
            .iter()
            .map(|o| o.processing_time_ms)
            .collect::<Vec<_>>()
    );

    Ok(())
}

fn read_single_file<R: TextRecognizer>(
    path: &PathBuf,
    lector: &Lector<R>,
) -> Result<LectorResult, ErrorResponse> {
    validate_input(path)?;

    lector
        .read_dni(path)
        .map_err(|e| ErrorResponse::new(e.to_string(), e.code()))
}
