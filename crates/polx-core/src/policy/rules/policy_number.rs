//! Policy number extraction.

use regex::Regex;

use super::patterns::{
    char_window, find_keyword, CERTIFICATE_NUMBER, CERTIFIED_COPY_NUMBER, DIGIT_RUN,
    POLICY_NUMBER, PREFIXED_NUMBER, RENEWAL_ENDORSEMENT_NUMBER, RENEWAL_NUMBER,
    TABULAR_POLICY_NUMBER, TRAFFIC_NUMBER_WITH_SUFFIX,
};
use super::{ExtractionMatch, FieldExtractor};

/// Labels searched by the proximity fallback.
const POLICY_NUMBER_KEYWORDS: &[&str] = &["Poliçe No", "Police No", "Poliçe Numara", "Policy No"];

/// Characters searched after a policy number label.
const KEYWORD_WINDOW: usize = 150;

/// Issuer-specific labels tried before the generic one, in order.
fn issuer_rules() -> [(&'static Regex, &'static str); 5] {
    [
        (&*CERTIFICATE_NUMBER, "certificate_number"),
        (&*CERTIFIED_COPY_NUMBER, "certified_copy_number"),
        (&*TRAFFIC_NUMBER_WITH_SUFFIX, "traffic_number_with_suffix"),
        (&*RENEWAL_ENDORSEMENT_NUMBER, "renewal_endorsement_number"),
        (&*RENEWAL_NUMBER, "renewal_number"),
    ]
}

fn capture(text: &str, pattern: &Regex, confidence: f32, rule: &'static str) -> Option<ExtractionMatch<String>> {
    let caps = pattern.captures(text)?;
    let m = caps.get(1)?;
    let value = m.as_str().trim();
    (!value.is_empty()).then(|| {
        ExtractionMatch::new(value.to_string(), confidence, m.as_str())
            .with_position(m.start(), m.end())
            .with_rule(rule)
    })
}

/// Policy number extractor.
pub struct PolicyNumberExtractor;

impl PolicyNumberExtractor {
    pub fn new() -> Self {
        Self
    }

    fn labeled(&self, text: &str) -> Option<ExtractionMatch<String>> {
        capture(text, &POLICY_NUMBER, 0.90, "policy_number_labeled")
            .filter(|m| (6..=30).contains(&m.value.len()))
    }

    fn near_keyword(&self, text: &str) -> Option<ExtractionMatch<String>> {
        POLICY_NUMBER_KEYWORDS.iter().find_map(|keyword| {
            let (start, _) = find_keyword(text, keyword)?;
            let window = char_window(text, start, KEYWORD_WINDOW);

            if let Some(m) = PREFIXED_NUMBER.find(window) {
                return Some(
                    ExtractionMatch::new(m.as_str().to_string(), 0.90, m.as_str())
                        .with_position(start + m.start(), start + m.end())
                        .with_rule("keyword_prefixed_number"),
                );
            }
            DIGIT_RUN.find(window).map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), 0.85, m.as_str())
                    .with_position(start + m.start(), start + m.end())
                    .with_rule("keyword_digit_run")
            })
        })
    }
}

impl Default for PolicyNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PolicyNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        issuer_rules()
            .into_iter()
            .find_map(|(pattern, rule)| capture(text, pattern, 0.95, rule))
            .or_else(|| self.labeled(text))
            .or_else(|| self.near_keyword(text))
            .or_else(|| capture(text, &TABULAR_POLICY_NUMBER, 0.85, "tabular_policy_number"))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        POLICY_NUMBER
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| {
                ExtractionMatch::new(m.as_str().to_string(), 0.90, m.as_str())
                    .with_position(m.start(), m.end())
                    .with_rule("policy_number_labeled")
            })
            .collect()
    }
}
