//! Core library for Turkish insurance policy extraction.
//!
//! This crate provides:
//! - Issuer and policy category detection
//! - Field extraction (policy number, dates, premiums, insured party, plate)
//! - Business rule validation and overall confidence scoring
//! - PDF text extraction (behind the `pdf` feature)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod policy;

pub use error::{ExtractionError, PdfError, PolxError, Result};
pub use models::config::PolxConfig;
pub use models::policy::{
    Field, Insured, Issuer, PolicyCategory, PolicyPeriod, PolicyRecord, Premium, Vehicle,
};
#[cfg(feature = "pdf")]
pub use pdf::{PdfDocument, PdfProcessor, PdfTextSource};
pub use policy::{ExtractionResult, PolicyOrchestrator, PolicyPipeline, ValidationReport, Validator};
