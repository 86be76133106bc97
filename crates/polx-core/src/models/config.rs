//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PolxError;

/// Main configuration for the polx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolxConfig {
    /// Policy extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF text extraction configuration.
    pub pdf: PdfConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Policy extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Minimum overall confidence for a document to count as successful.
    pub acceptance_threshold: f32,

    /// Characters searched after a money label by the proximity fallback.
    pub keyword_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.5,
            keyword_window: 50,
        }
    }
}

/// PDF text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Largest accepted PDF in megabytes.
    pub max_file_size_mb: u64,

    /// Minimum extracted text length before a PDF is considered unreadable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            min_text_length: 0,
        }
    }
}

impl PdfConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Documents processed at the same time.
    pub jobs: usize,

    /// Largest number of files accepted in one batch.
    pub max_files: usize,

    /// Keep going when one file fails.
    pub continue_on_error: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            max_files: 100,
            continue_on_error: true,
        }
    }
}

impl PolxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), PolxError> {
        let threshold = self.extraction.acceptance_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PolxError::Config(format!(
                "extraction.acceptance_threshold must be between 0 and 1, got {}",
                threshold
            )));
        }
        if self.extraction.keyword_window == 0 {
            return Err(PolxError::Config("extraction.keyword_window must be positive".to_string()));
        }
        if self.batch.jobs == 0 {
            return Err(PolxError::Config("batch.jobs must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PolxConfig =
            serde_json::from_str(r#"{"extraction": {"acceptance_threshold": 0.6}}"#).unwrap();

        assert_eq!(config.extraction.acceptance_threshold, 0.6);
        assert_eq!(config.extraction.keyword_window, 50);
        assert_eq!(config.batch.jobs, 4);
        assert_eq!(config.pdf.max_file_size_bytes(), 50 * 1024 * 1024);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PolxConfig::default();
        config.batch.jobs = 8;
        config.save(&path).unwrap();

        let loaded = PolxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.batch.jobs, 8);
        assert_eq!(loaded.extraction.acceptance_threshold, 0.5);
    }

    #[test]
    fn test_validate() {
        assert!(PolxConfig::default().validate().is_ok());

        let mut config = PolxConfig::default();
        config.extraction.acceptance_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("acceptance_threshold"));

        let mut config = PolxConfig::default();
        config.batch.jobs = 0;
        assert!(config.validate().is_err());
    }
}
