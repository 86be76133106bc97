//! Rule-based field extractors for Turkish insurance policies.
//!
//! Every extractor works on raw document text only. None of them look at the
//! output of another, so the order they run in never changes the result.

pub mod contact;
pub mod dates;
pub mod money;
pub mod name;
pub mod national_id;
pub mod patterns;
pub mod plate;
pub mod policy_number;
pub mod vehicle;

pub use contact::{extract_address, extract_contact, extract_phone, ContactDetails};
pub use dates::{extract_period, parse_date, DateExtractor, PolicyDates};
pub use money::{format_amount, parse_amount, Amount, MoneyExtractor};
pub use name::{is_valid_name, normalize_name, NameExtractor};
pub use national_id::{extract_national_id, validate_national_id, NationalIdExtractor};
pub use plate::{format_plate, is_valid_plate, PlateExtractor};
pub use policy_number::PolicyNumberExtractor;
pub use vehicle::{VehicleDetails, VehicleExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
    /// Name of the rule that produced the value.
    pub rule: &'static str,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
            rule: "",
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn with_rule(mut self, rule: &'static str) -> Self {
        self.rule = rule;
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            confidence: self.confidence,
            position: self.position,
            source: self.source,
            rule: self.rule,
        }
    }
}

/// Split an optional match into `(value, confidence)`; absent values score 0.
pub fn into_pair<T>(found: Option<ExtractionMatch<T>>) -> (Option<T>, f32) {
    match found {
        Some(m) => (Some(m.value), m.confidence),
        None => (None, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_pair() {
        let found = ExtractionMatch::new(7, 0.9, "7").with_rule("digits");
        assert_eq!(into_pair(Some(found)), (Some(7), 0.9));
        assert_eq!(into_pair::<i32>(None), (None, 0.0));
    }

    #[test]
    fn test_map_keeps_metadata() {
        let found = ExtractionMatch::new("7", 0.8, "7")
            .with_position(3, 4)
            .with_rule("digits")
            .map(|s| s.len());
        assert_eq!(found.value, 1);
        assert_eq!(found.position, Some((3, 4)));
        assert_eq!(found.rule, "digits");
    }
}
