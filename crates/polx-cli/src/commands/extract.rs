//! Extract command - extract data from a single policy file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use polx_core::PolicyPipeline;

use super::{format_result, load_config, read_document, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let (text, page_count) = read_document(&args.input, &config.pdf)?;
    let label = args
        .input
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string);

    let pipeline = PolicyPipeline::from_config(&config);
    let result = pipeline.process(&text, label.as_deref(), page_count);

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if !result.success {
        eprintln!(
            "{} Extraction did not meet the acceptance criteria",
            style("✗").red()
        );
    }

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            result.confidence * 100.0
        );
        if let Some(record) = &result.record {
            for (field, confidence) in &record.metadata.field_confidence {
                println!("   {:<16} {:.2}", field.as_str(), confidence);
            }
        }
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    Ok(())
}
