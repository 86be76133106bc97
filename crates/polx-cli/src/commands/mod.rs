//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::path::Path;

use polx_core::models::config::{PdfConfig, PolxConfig};
use polx_core::pdf::PdfTextSource;
use polx_core::policy::rules::format_amount;
use polx_core::ExtractionResult;

/// Output format for extraction results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Load the configuration from an explicit path, the default location, or defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PolxConfig> {
    let config = match path {
        Some(path) => PolxConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                PolxConfig::from_file(&default_path)?
            } else {
                PolxConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

/// Text of a policy document and its page count when known.
pub fn read_document(path: &Path, pdf: &PdfConfig) -> anyhow::Result<(String, Option<usize>)> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let document = PdfTextSource::from_config(pdf).read(&data)?;
            Ok((document.text, Some(document.page_count)))
        }
        "txt" => Ok((fs::read_to_string(path)?, None)),
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Whether a path has an extension the CLI can read.
pub fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_result_csv(result),
        OutputFormat::Text => Ok(format_result_text(result)),
    }
}

const CSV_HEADER: [&str; 13] = [
    "file",
    "success",
    "issuer",
    "category",
    "policy_number",
    "start_date",
    "end_date",
    "net_premium",
    "gross_premium",
    "insured_name",
    "plate_number",
    "confidence",
    "errors",
];

fn csv_row(result: &ExtractionResult) -> Vec<String> {
    let opt = |value: Option<String>| value.unwrap_or_default();
    let record = result.record.as_ref();

    vec![
        opt(result.file_name.clone()),
        result.success.to_string(),
        opt(record.and_then(|r| r.issuer_name.clone())),
        opt(record.map(|r| r.category.to_string())),
        opt(record.and_then(|r| r.policy_number.clone())),
        opt(record.and_then(|r| r.period.start_date).map(|d| d.to_string())),
        opt(record.and_then(|r| r.period.end_date).map(|d| d.to_string())),
        opt(record.and_then(|r| r.premium.net).map(|v| v.to_string())),
        opt(record.and_then(|r| r.premium.gross).map(|v| v.to_string())),
        opt(record.and_then(|r| r.insured.name.clone())),
        opt(record.and_then(|r| r.plate()).map(str::to_string)),
        format!("{:.2}", result.confidence),
        result.errors.join("; "),
    ]
}

fn format_result_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(result))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write one summary row per result.
pub fn write_summary(path: &Path, results: &[ExtractionResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for result in results {
        wtr.write_record(csv_row(result))?;
    }
    wtr.flush()?;
    Ok(())
}

fn format_result_text(result: &ExtractionResult) -> String {
    let mut output = String::new();
    let status = if result.success { "OK" } else { "FAILED" };

    if let Some(name) = &result.file_name {
        output.push_str(&format!("File: {}\n", name));
    }
    output.push_str(&format!("Status: {}\n", status));

    if let Some(record) = &result.record {
        let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

        output.push_str(&format!("Issuer: {}\n", or_dash(record.issuer_name.clone())));
        output.push_str(&format!("Category: {}\n", record.category));
        output.push_str(&format!("Policy number: {}\n", or_dash(record.policy_number.clone())));
        output.push_str(&format!(
            "Period: {} - {}\n",
            or_dash(record.period.start_date.map(|d| d.format("%d.%m.%Y").to_string())),
            or_dash(record.period.end_date.map(|d| d.format("%d.%m.%Y").to_string())),
        ));
        output.push('\n');

        output.push_str("Premium:\n");
        output.push_str(&format!("  Net:   {} TL\n", or_dash(record.premium.net.map(format_amount))));
        output.push_str(&format!("  Tax:   {} TL\n", or_dash(record.premium.tax.map(format_amount))));
        output.push_str(&format!("  Gross: {} TL\n", or_dash(record.premium.gross.map(format_amount))));
        output.push('\n');

        output.push_str("Insured:\n");
        output.push_str(&format!("  {}\n", or_dash(record.insured.name.clone())));
        if let Some(id) = &record.insured.national_id {
            output.push_str(&format!("  TCKN: {}\n", id));
        }

        if let Some(vehicle) = &record.vehicle {
            output.push_str("\nVehicle:\n");
            output.push_str(&format!("  Plate: {}\n", or_dash(vehicle.plate.clone())));
            if let (Some(make), model) = (&vehicle.make, &vehicle.model) {
                output.push_str(&format!("  {} {}\n", make, model.as_deref().unwrap_or("")));
            }
        }
    }

    for error in &result.errors {
        output.push_str(&format!("\nerror: {}", error));
    }
    for warning in &result.warnings {
        output.push_str(&format!("\nwarning: {}", warning));
    }

    output
}
