//! Error types for the polx-core library.

use thiserror::Error;

/// Main error type for the polx library.
#[derive(Error, Debug)]
pub enum PolxError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Policy extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to turning a PDF into text.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The file exceeds the configured size limit.
    #[error("PDF is too large: {size} bytes (limit {limit} bytes)")]
    TooLarge { size: u64, limit: u64 },
}

/// Errors related to policy extraction.
///
/// Ordinary absence of a field is never an error; these only describe
/// documents the pipeline could not work on at all.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The document text is empty or whitespace only.
    #[error("document text is empty")]
    EmptyText,

    /// A step panicked while extracting a field.
    #[error("internal failure while extracting {field}: {reason}")]
    Internal { field: String, reason: String },
}

/// Result type for the polx library.
pub type Result<T> = std::result::Result<T, PolxError>;
