//! Issuer and policy category detection.

use tracing::debug;

use super::rules::patterns::{
    fold_case, CANCELLATION_KEYWORDS, CATEGORY_KEYWORDS, ISSUER_KEYWORDS,
};
use crate::models::policy::{Issuer, PolicyCategory};

/// Detected issuer.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuerDetection {
    pub issuer: Issuer,
    pub confidence: f32,
    /// Keyword that won, if any.
    pub keyword: Option<&'static str>,
}

impl IssuerDetection {
    pub fn unknown() -> Self {
        Self {
            issuer: Issuer::Unknown,
            confidence: 0.0,
            keyword: None,
        }
    }

    pub fn display_name(&self) -> Option<&'static str> {
        self.issuer.is_known().then(|| self.issuer.display_name())
    }
}

/// Detected policy category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDetection {
    pub category: PolicyCategory,
    pub confidence: f32,
    pub keyword: Option<&'static str>,
}

impl CategoryDetection {
    pub fn unknown() -> Self {
        Self {
            category: PolicyCategory::Unknown,
            confidence: 0.0,
            keyword: None,
        }
    }
}

#[derive(Debug)]
struct KeywordHit {
    issuer: Issuer,
    keyword: &'static str,
    score: usize,
    first_position: usize,
}

/// Character offsets of whole-word occurrences of `needle` in `haystack`.
///
/// Both are expected to be case folded already.
fn word_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    haystack
        .match_indices(needle)
        .filter(|(start, matched)| {
            let before = haystack[..*start].chars().next_back();
            let after = haystack[start + matched.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .map(|(start, _)| haystack[..start].chars().count())
        .collect()
}

fn score_hit(keyword_len: usize, first_position: usize, occurrences: usize) -> usize {
    let mut score = keyword_len;
    if first_position < 500 {
        score += 10;
    } else if first_position < 1000 {
        score += 5;
    }
    // Repeated headers and footers are a strong signal
    if occurrences > 3 {
        score += 15;
    }
    score
}

/// Detect the issuing insurance company.
pub fn detect_issuer(text: &str) -> IssuerDetection {
    let folded = fold_case(text);
    let mut hits = Vec::new();

    for (issuer, keywords) in ISSUER_KEYWORDS {
        let mut seen: Vec<String> = Vec::new();
        for &keyword in *keywords {
            let folded_keyword = fold_case(keyword);
            if seen.contains(&folded_keyword) {
                continue;
            }

            let positions = word_occurrences(&folded, &folded_keyword);
            if let Some(&first_position) = positions.first() {
                hits.push(KeywordHit {
                    issuer: *issuer,
                    keyword,
                    score: score_hit(folded_keyword.chars().count(), first_position, positions.len()),
                    first_position,
                });
            }
            seen.push(folded_keyword);
        }
    }

    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.first_position.cmp(&b.first_position))
    });

    let Some(best) = hits.first() else {
        return IssuerDetection::unknown();
    };

    let mut confidence = (best.score as f32 / 20.0).min(0.8);
    if hits.len() > 1 {
        confidence += 0.1;
    }
    if best.score > 15 {
        confidence += 0.1;
    }

    debug!(
        issuer = %best.issuer,
        keyword = best.keyword,
        score = best.score,
        candidates = hits.len(),
        "issuer detected"
    );

    IssuerDetection {
        issuer: best.issuer,
        confidence: confidence.min(1.0),
        keyword: Some(best.keyword),
    }
}

/// Detect the policy category.
pub fn detect_category(text: &str) -> CategoryDetection {
    let folded = fold_case(text);
    let mut best: Option<(PolicyCategory, &'static str, usize, usize)> = None;

    for (category, keywords) in CATEGORY_KEYWORDS {
        let matched: Vec<&'static str> = keywords
            .iter()
            .copied()
            .filter(|keyword| folded.contains(&fold_case(keyword)))
            .collect();

        let Some(longest) = matched.iter().copied().max_by_key(|k| k.chars().count()) else {
            continue;
        };
        let score = longest.chars().count();

        if best.is_none_or(|(_, _, best_score, _)| score > best_score) {
            best = Some((*category, longest, score, matched.len()));
        }
    }

    match best {
        Some((category, keyword, score, matches)) => {
            debug!(category = %category, keyword, score, matches, "category detected");
            CategoryDetection {
                category,
                confidence: (0.7 + 0.1 * matches as f32).min(0.95),
                keyword: Some(keyword),
            }
        }
        None => CategoryDetection::unknown(),
    }
}

/// Whether the document is a cancellation, endorsement or termination notice.
pub fn detect_cancellation(text: &str) -> bool {
    let folded = fold_case(text);
    CANCELLATION_KEYWORDS
        .iter()
        .any(|keyword| folded.contains(&fold_case(keyword)))
}
