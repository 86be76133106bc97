//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Text pulled out of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    pub text: String,
    pub page_count: usize,
}

/// PDF text source backed by lopdf.
pub struct PdfTextSource {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_file_size: u64,
    min_text_length: usize,
}

impl PdfTextSource {
    /// Create a text source with default limits.
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    /// Create a text source with the limits of a configuration.
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_file_size: config.max_file_size_bytes(),
            min_text_length: config.min_text_length,
        }
    }

    /// Load a PDF and extract its text in one step.
    pub fn read(&mut self, data: &[u8]) -> Result<PdfDocument> {
        self.load(data)?;
        let text = self.extract_text()?;
        Ok(PdfDocument {
            text,
            page_count: self.page_count(),
        })
    }
}

impl Default for PdfTextSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfTextSource {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let size = data.len() as u64;
        if size > self.max_file_size {
            return Err(PdfError::TooLarge {
                size,
                limit: self.max_file_size,
            });
        }

        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Many policy PDFs are encrypted with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len())
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let text = pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        let length = text.trim().chars().count();
        if length < self.min_text_length {
            return Err(PdfError::TextExtraction(format!(
                "only {} characters of text, expected at least {}",
                length, self.min_text_length
            )));
        }

        debug!("Extracted {} characters of text", length);
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_source_is_empty() {
        let source = PdfTextSource::new();
        assert!(source.document.is_none());
        assert_eq!(source.page_count(), 0);
        assert!(matches!(source.extract_text(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_rejects_oversized_input() {
        let config = PdfConfig {
            max_file_size_mb: 0,
            ..Default::default()
        };
        let err = PdfTextSource::from_config(&config).read(b"%PDF-1.4").unwrap_err();
        assert!(matches!(err, PdfError::TooLarge { size: 8, limit: 0 }));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = PdfTextSource::new().read(b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }
}
