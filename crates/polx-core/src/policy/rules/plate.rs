//! Vehicle plate extraction.
//!
//! Turkish plates are a two digit province code, one to three letters and
//! two to four digits: `34 ABC 123`, `06 A 1234`.

use super::patterns::{char_window, find_keyword, PLATE_LABELED, PLATE_TOKEN};
use super::{ExtractionMatch, FieldExtractor};

/// Labels searched by the proximity fallback.
const PLATE_KEYWORDS: &[&str] = &["Plaka No", "Plaka", "Plate No"];

/// Characters searched after a plate label.
const KEYWORD_WINDOW: usize = 50;

fn clean(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Check the shape of a plate candidate.
///
/// After removing spaces it must be 6-9 characters and start with two digits.
pub fn is_valid_plate(plate: &str) -> bool {
    let cleaned = clean(plate);
    let len = cleaned.chars().count();
    (6..=9).contains(&len) && cleaned.chars().take(2).all(|c| c.is_ascii_digit())
}

/// Canonical `PP LLL NNN` form of a plate.
pub fn format_plate(plate: &str) -> String {
    let mut cleaned = clean(plate);

    // Some issuers print the province code with a leading zero: 016MA0437
    let bytes = cleaned.as_bytes();
    if bytes.len() > 2 && bytes[0] == b'0' && bytes[1].is_ascii_digit() && bytes[2].is_ascii_digit() {
        cleaned.remove(0);
    }

    if cleaned.len() <= 2 || !cleaned.is_char_boundary(2) {
        return cleaned;
    }

    let (province, rest) = cleaned.split_at(2);
    match rest.find(|c: char| c.is_ascii_digit()) {
        Some(digit_start) if digit_start > 0 => {
            let (letters, digits) = rest.split_at(digit_start);
            format!("{} {} {}", province, letters, digits)
        }
        _ => cleaned,
    }
}

fn plate_match(candidate: &str, offset: usize, confidence: f32, rule: &'static str) -> Option<ExtractionMatch<String>> {
    is_valid_plate(candidate).then(|| {
        ExtractionMatch::new(format_plate(candidate), confidence, candidate)
            .with_position(offset, offset + candidate.len())
            .with_rule(rule)
    })
}

/// Plate number extractor.
pub struct PlateExtractor;

impl PlateExtractor {
    pub fn new() -> Self {
        Self
    }

    fn near_keyword(&self, text: &str) -> Option<ExtractionMatch<String>> {
        PLATE_KEYWORDS.iter().find_map(|keyword| {
            let (start, _) = find_keyword(text, keyword)?;
            let window = char_window(text, start, KEYWORD_WINDOW);
            PLATE_TOKEN.captures_iter(window).find_map(|caps| {
                let m = caps.get(1)?;
                plate_match(m.as_str(), start + m.start(), 0.95, "plate_near_keyword")
            })
        })
    }
}

impl Default for PlateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PlateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        PLATE_LABELED
            .captures_iter(text)
            .find_map(|caps| {
                let m = caps.get(1)?;
                plate_match(m.as_str(), m.start(), 0.95, "plate_labeled")
            })
            .or_else(|| self.near_keyword(text))
            .or_else(|| self.extract_all(text).into_iter().next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        PLATE_TOKEN
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                plate_match(m.as_str(), m.start(), 0.90, "plate_token")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_valid_plate() {
        assert!(is_valid_plate("34 ABC 123"));
        assert!(is_valid_plate("06a1234"));
        assert!(is_valid_plate("016MA0437"));
        assert!(!is_valid_plate("34 A 1"));
        assert!(!is_valid_plate("A4 ABC 123"));
        assert!(!is_valid_plate("34 ABCD 12345"));
    }

    #[test]
    fn test_format_plate() {
        assert_eq!(format_plate("34ABC123"), "34 ABC 123");
        assert_eq!(format_plate("06 a 1234"), "06 A 1234");
        assert_eq!(format_plate("016MA0437"), "16 MA 0437");
        assert_eq!(format_plate("34"), "34");
    }

    #[test]
    fn test_round_trip() {
        let canonical = format_plate("34ABC123");
        let compact: String = canonical.split_whitespace().collect();
        assert_eq!(format_plate(&compact), canonical);

        let sentence = format!("Araç plakası {} olarak kayıtlıdır", canonical);
        let found = PlateExtractor::new().extract(&sentence).unwrap();
        assert_eq!(found.value, canonical);
    }

    #[test]
    fn test_labeled_plate() {
        let found = PlateExtractor::new().extract("Plaka       :016MA0437").unwrap();
        assert_eq!(found.value, "16 MA 0437");
        assert_eq!(found.confidence, 0.95);
        assert_eq!(found.rule, "plate_labeled");
    }

    #[test]
    fn test_plate_near_keyword() {
        let found = PlateExtractor::new().extract("Plaka No\n35 KL 4521").unwrap();
        assert_eq!(found.value, "35 KL 4521");
        assert_eq!(found.confidence, 0.95);
        assert_eq!(found.rule, "plate_near_keyword");
    }

    #[test]
    fn test_bare_plate() {
        let found = PlateExtractor::new().extract("araç 07 ZT 88 kasko").unwrap();
        assert_eq!(found.value, "07 ZT 88");
        assert_eq!(found.confidence, 0.90);
    }
}
