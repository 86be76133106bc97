//! Insured party name extraction.

use super::patterns::{
    char_window, find_keyword, fold_case, NAME_AFTER_LABEL, NAME_DENYLIST, NAME_LABELED,
    NAME_NEXT_LINE, NAME_WITH_TITLE,
};
use super::{ExtractionMatch, FieldExtractor};
use regex::Regex;

/// Labels searched by the proximity fallback, including OCR'd variants.
const NAME_KEYWORDS: &[&str] = &[
    "Adı Soyadı",
    "Adõ Soyadõ",
    "İsim",
    "Sigortalı",
    "Ad Soyad",
    "Unvanı",
    "Unvanõ",
];

/// Characters searched after a name label.
const KEYWORD_WINDOW: usize = 200;

fn is_denylisted(token: &str) -> bool {
    let folded = fold_case(token.trim_matches(|c: char| c == ',' || c == ':'));
    NAME_DENYLIST.iter().any(|deny| fold_case(deny) == folded)
}

/// Check that a candidate looks like a person or company name.
///
/// 2-5 tokens, each at least two characters, none of them an address or
/// company abbreviation.
pub fn is_valid_name(name: &str) -> bool {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    (2..=5).contains(&tokens.len())
        && tokens
            .iter()
            .all(|t| t.chars().count() >= 2 && !is_denylisted(t))
}

/// Drop denylisted tokens and collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .filter(|t| !is_denylisted(t))
        .collect::<Vec<_>>()
        .join(" ")
}

fn candidate(raw: &str, offset: usize, confidence: f32, rule: &'static str) -> Option<ExtractionMatch<String>> {
    let name = normalize_name(raw);
    is_valid_name(&name).then(|| {
        ExtractionMatch::new(name, confidence, raw)
            .with_position(offset, offset + raw.len())
            .with_rule(rule)
    })
}

fn from_pattern(text: &str, pattern: &Regex, confidence: f32, rule: &'static str) -> Option<ExtractionMatch<String>> {
    pattern.captures_iter(text).find_map(|caps| {
        let m = caps.get(1)?;
        candidate(m.as_str(), m.start(), confidence, rule)
    })
}

/// Insured name extractor.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }

    fn near_keyword(&self, text: &str) -> Option<ExtractionMatch<String>> {
        NAME_KEYWORDS.iter().find_map(|keyword| {
            let (start, _) = find_keyword(text, keyword)?;
            let window = char_window(text, start, KEYWORD_WINDOW);
            NAME_AFTER_LABEL.captures_iter(window).find_map(|caps| {
                let m = caps.get(1)?;
                candidate(m.as_str(), start + m.start(), 0.75, "name_near_keyword")
            })
        })
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        from_pattern(text, &NAME_NEXT_LINE, 0.90, "name_next_line")
            .or_else(|| from_pattern(text, &NAME_WITH_TITLE, 0.90, "name_with_title"))
            .or_else(|| from_pattern(text, &NAME_LABELED, 0.85, "name_labeled"))
            .or_else(|| self.near_keyword(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        NAME_LABELED
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                candidate(m.as_str(), m.start(), 0.85, "name_labeled")
            })
            .collect()
    }
}
