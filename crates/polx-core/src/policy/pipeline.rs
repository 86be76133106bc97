//! Orchestrator, validator and acceptance threshold wired together.

use std::thread;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::orchestrator::PolicyOrchestrator;
use super::validator::Validator;
use crate::error::ExtractionError;
use crate::models::config::PolxConfig;
use crate::models::policy::PolicyRecord;

/// Result of processing one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// No validation errors and confidence at or above the threshold.
    pub success: bool,
    /// Extracted record, absent when the text was empty.
    pub record: Option<PolicyRecord>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Overall confidence of the record.
    pub confidence: f32,
    /// File name or other label supplied by the caller.
    pub file_name: Option<String>,
    pub page_count: Option<usize>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Policy processing pipeline.
pub struct PolicyPipeline {
    orchestrator: PolicyOrchestrator,
    validator: Validator,
    acceptance_threshold: f32,
}

impl PolicyPipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self {
            orchestrator: PolicyOrchestrator::new(),
            validator: Validator::new(),
            acceptance_threshold: 0.5,
        }
    }

    /// Create a pipeline from configuration.
    pub fn from_config(config: &PolxConfig) -> Self {
        Self::new()
            .with_orchestrator(
                PolicyOrchestrator::new().with_keyword_window(config.extraction.keyword_window),
            )
            .with_acceptance_threshold(config.extraction.acceptance_threshold)
    }

    pub fn with_orchestrator(mut self, orchestrator: PolicyOrchestrator) -> Self {
        self.orchestrator = orchestrator;
        self
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Set the minimum confidence for a successful result.
    pub fn with_acceptance_threshold(mut self, threshold: f32) -> Self {
        self.acceptance_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn acceptance_threshold(&self) -> f32 {
        self.acceptance_threshold
    }

    /// Process the text of one document.
    pub fn process(&self, text: &str, label: Option<&str>, page_count: Option<usize>) -> ExtractionResult {
        let start = Instant::now();
        let mut result = ExtractionResult {
            file_name: label.map(str::to_string),
            page_count,
            ..Default::default()
        };

        if text.trim().is_empty() {
            result.errors.push(ExtractionError::EmptyText.to_string());
            result.processing_time_ms = start.elapsed().as_millis() as u64;
            info!(file = label.unwrap_or("-"), "document text is empty");
            return result;
        }

        let orchestration = self.orchestrator.extract(text);
        let mut record = orchestration.record;
        let report = self.validator.validate(&mut record);

        result.confidence = record.metadata.confidence;
        result.errors = report.errors;
        result.warnings = orchestration.warnings;
        result.warnings.extend(report.warnings);
        result.success =
            result.errors.is_empty() && result.confidence >= self.acceptance_threshold;
        result.record = Some(record);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            file = label.unwrap_or("-"),
            success = result.success,
            confidence = result.confidence,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "document processed"
        );

        result
    }

    /// Process several `(label, text)` documents in parallel.
    ///
    /// Results come back in input order. A document whose processing panics
    /// yields a failed result without affecting the others.
    pub fn process_batch(&self, documents: &[(String, String)]) -> Vec<ExtractionResult> {
        debug!(documents = documents.len(), "processing batch");

        thread::scope(|scope| {
            let handles: Vec<_> = documents
                .iter()
                .map(|(label, text)| scope.spawn(move || self.process(text, Some(label), None)))
                .collect();

            handles
                .into_iter()
                .zip(documents)
                .map(|(handle, (label, _))| {
                    handle.join().unwrap_or_else(|_| ExtractionResult {
                        file_name: Some(label.clone()),
                        errors: vec![format!("processing of {} panicked", label)],
                        ..Default::default()
                    })
                })
                .collect()
        })
    }
}

impl Default for PolicyPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const POLICY: &str = "ALLIANZ SİGORTA A.Ş.\n\
        KONUT SİGORTASI POLİÇESİ\n\
        Poliçe No: 123456789\n\
        Başlangıç Tarihi: 01.03.2025\n\
        Bitiş Tarihi: 01.03.2026\n\
        Brüt Prim: 1.250,00 TL\n";

    fn pipeline() -> PolicyPipeline {
        PolicyPipeline::new()
            .with_validator(Validator::new().with_reference_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
    }

    #[test]
    fn test_empty_text_fails() {
        let result = pipeline().process("  \n", Some("empty.txt"), Some(1));

        assert!(!result.success);
        assert!(result.record.is_none());
        assert_eq!(result.errors, vec!["document text is empty"]);
        assert_eq!(result.file_name.as_deref(), Some("empty.txt"));
        assert_eq!(result.page_count, Some(1));
    }

    #[test]
    fn test_process_policy() {
        let result = pipeline().process(POLICY, None, None);
        let record = result.record.as_ref().unwrap();

        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert!(result.success);
        assert_eq!(record.policy_number.as_deref(), Some("123456789"));
        assert_eq!(record.period.duration_days, Some(365));
        assert_eq!(result.confidence, record.metadata.confidence);
    }

    #[test]
    fn test_threshold_blocks_success() {
        let result = pipeline().with_acceptance_threshold(1.0).process(POLICY, None, None);
        assert!(result.errors.is_empty());
        assert!(!result.success);
    }

    #[test]
    fn test_batch_keeps_order() {
        let documents = vec![
            ("a.txt".to_string(), POLICY.to_string()),
            ("b.txt".to_string(), String::new()),
            ("c.txt".to_string(), "Genel şartlar".to_string()),
        ];
        let results = pipeline().process_batch(&documents);

        let labels: Vec<_> = results.iter().map(|r| r.file_name.as_deref().unwrap()).collect();
        assert_eq!(labels, vec!["a.txt", "b.txt", "c.txt"]);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[2].errors.contains(&"issuer not detected".to_string()));
    }

    #[test]
    fn test_from_config() {
        let mut config = PolxConfig::default();
        config.extraction.acceptance_threshold = 0.8;
        assert_eq!(PolicyPipeline::from_config(&config).acceptance_threshold(), 0.8);
    }
}
