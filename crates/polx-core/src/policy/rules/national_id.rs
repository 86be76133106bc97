//! Turkish national identity number (TC kimlik no) extraction and validation.

use super::patterns::NATIONAL_ID_CANDIDATE;
use super::{ExtractionMatch, FieldExtractor};

/// Validate a national identity number.
///
/// The number has 11 digits and does not start with 0. The tenth digit is
/// `(7 * (d1 + d3 + d5 + d7 + d9) - (d2 + d4 + d6 + d8)) mod 10` and the
/// eleventh is the sum of the first ten digits mod 10.
pub fn validate_national_id(id: &str) -> bool {
    if id.len() != 11 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<i32> = id.bytes().map(|b| (b - b'0') as i32).collect();
    if digits[0] == 0 {
        return false;
    }

    let odd_sum: i32 = digits[..9].iter().step_by(2).sum();
    let even_sum: i32 = digits[1..8].iter().step_by(2).sum();
    if (odd_sum * 7 - even_sum).rem_euclid(10) != digits[9] {
        return false;
    }

    digits[..10].iter().sum::<i32>() % 10 == digits[10]
}

/// Extract the first valid national identity number from text.
pub fn extract_national_id(text: &str) -> Option<String> {
    NationalIdExtractor::new().extract(text).map(|m| m.value)
}

/// National identity number extractor.
pub struct NationalIdExtractor;

impl NationalIdExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NationalIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NationalIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        NATIONAL_ID_CANDIDATE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter(|m| validate_national_id(m.as_str()))
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), 0.95, m.as_str())
                    .with_position(m.start(), m.end())
                    .with_rule("national_id_checksum")
            })
            .collect()
    }
}
