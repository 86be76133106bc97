//! Batch processing command for multiple policy files.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use polx_core::models::config::PdfConfig;
use polx_core::{ExtractionResult, PolicyPipeline};

use super::{format_result, is_supported, load_config, read_document, write_summary, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }
    if files.len() > config.batch.max_files {
        anyhow::bail!(
            "{} files matched, more than the limit of {}",
            files.len(),
            config.batch.max_files
        );
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let continue_on_error = args.continue_on_error || config.batch.continue_on_error;

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(PolicyPipeline::from_config(&config));
    let pdf_config = Arc::new(config.pdf.clone());
    let semaphore = Arc::new(Semaphore::new(jobs));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let pipeline = Arc::clone(&pipeline);
        let pdf_config = Arc::clone(&pdf_config);
        let semaphore = Arc::clone(&semaphore);
        let progress = progress.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let result = tokio::task::spawn_blocking(move || {
                process_single_file(path, &pipeline, &pdf_config)
            })
            .await?;
            progress.inc(1);
            anyhow::Ok(result)
        }));
    }

    let mut results: Vec<ExtractionResult> = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, outcome) = handle.await??;
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                let message = e.to_string();
                if !continue_on_error {
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
                warn!("Failed to process {}: {}", path.display(), message);
                results.push(ExtractionResult {
                    file_name: path.file_name().and_then(|s| s.to_str()).map(str::to_string),
                    errors: vec![message],
                    ..Default::default()
                });
            }
        }
    }

    progress.finish_with_message("Complete");

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            let stem = result
                .file_name
                .as_deref()
                .and_then(|name| name.rsplit_once('.').map(|(stem, _)| stem))
                .unwrap_or("policy");
            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));

            fs::write(&output_path, format_result(result, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = results.iter().filter(|r| r.success).count();
    let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.file_name.as_deref().unwrap_or("?"),
                result
                    .errors
                    .first()
                    .map(String::as_str)
                    .unwrap_or("confidence below threshold")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: PathBuf,
    pipeline: &PolicyPipeline,
    pdf_config: &PdfConfig,
) -> (PathBuf, anyhow::Result<ExtractionResult>) {
    let outcome = read_document(&path, pdf_config).map(|(text, page_count)| {
        let label = path.file_name().and_then(|s| s.to_str());
        pipeline.process(&text, label, page_count)
    });
    (path, outcome)
}
