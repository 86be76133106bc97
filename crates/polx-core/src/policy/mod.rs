//! Insurance policy field extraction module.

pub mod detector;
pub mod orchestrator;
pub mod pipeline;
pub mod rules;
pub mod validator;

pub use detector::{detect_cancellation, detect_category, detect_issuer, CategoryDetection, IssuerDetection};
pub use orchestrator::{overall_confidence, Orchestration, PolicyOrchestrator};
pub use pipeline::{ExtractionResult, PolicyPipeline};
pub use validator::{ValidationReport, Validator};
