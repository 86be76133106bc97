//! Date extraction for insurance policies.

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::patterns::{
    DATE_RANGE_COMBINED, DATE_TOKEN, END_DATE_LABELED, END_DATE_TABLE, ISSUE_DATE_BELOW,
    ISSUE_DATE_LABELED, ISSUE_DATE_TABLE, ISSUE_DATE_TRAILING, START_DATE_LABELED,
    START_DATE_TABLE,
};
use super::{ExtractionMatch, FieldExtractor};

/// Earliest year accepted for any policy date.
pub const MIN_YEAR: i32 = 1990;
/// Latest year accepted for any policy date.
pub const MAX_YEAR: i32 = 2050;

/// Parse a `d/m/yyyy` style date with `.`, `/` or `-` separators.
///
/// Dates outside [`MIN_YEAR`, `MAX_YEAR`] are rejected.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let normalized = s.trim().replace(['.', '-'], "/");
    let mut parts = normalized.split('/');

    let day: u32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    let year_part = parts.next()?;
    if parts.next().is_some() || year_part.len() != 4 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    is_plausible(date).then_some(date)
}

fn is_plausible(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&date.year())
}

/// First plausible date captured by `group` of `pattern`.
fn first_date(
    text: &str,
    pattern: &Regex,
    group: usize,
    confidence: f32,
    rule: &'static str,
) -> Option<ExtractionMatch<NaiveDate>> {
    pattern.captures_iter(text).find_map(|caps| {
        let m = caps.get(group)?;
        let date = parse_date(m.as_str())?;
        Some(
            ExtractionMatch::new(date, confidence, m.as_str())
                .with_position(m.start(), m.end())
                .with_rule(rule),
        )
    })
}

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Policy start date (başlangıç tarihi).
    pub fn extract_start_date(&self, text: &str) -> Option<ExtractionMatch<NaiveDate>> {
        first_date(text, &DATE_RANGE_COMBINED, 1, 0.98, "date_range_combined")
            .or_else(|| first_date(text, &START_DATE_LABELED, 1, 0.95, "start_date_labeled"))
            .or_else(|| first_date(text, &START_DATE_TABLE, 1, 0.90, "start_date_table"))
            .or_else(|| self.extract(text).map(|m| m.with_rule("first_plausible_date")))
    }

    /// Policy end date (bitiş tarihi).
    ///
    /// With a known start date, falls back to the first later date in the
    /// document.
    pub fn extract_end_date(
        &self,
        text: &str,
        start: Option<NaiveDate>,
    ) -> Option<ExtractionMatch<NaiveDate>> {
        first_date(text, &DATE_RANGE_COMBINED, 2, 0.98, "date_range_combined")
            .or_else(|| first_date(text, &END_DATE_LABELED, 1, 0.95, "end_date_labeled"))
            .or_else(|| first_date(text, &END_DATE_TABLE, 1, 0.90, "end_date_table"))
            .or_else(|| {
                let start = start?;
                self.extract_all(text)
                    .into_iter()
                    .find(|m| m.value > start)
                    .map(|m| ExtractionMatch {
                        confidence: 0.75,
                        ..m.with_rule("first_date_after_start")
                    })
            })
    }

    /// Issue date (tanzim / düzenleme tarihi).
    pub fn extract_issue_date(&self, text: &str) -> Option<ExtractionMatch<NaiveDate>> {
        first_date(text, &ISSUE_DATE_LABELED, 1, 0.95, "issue_date_labeled")
            .or_else(|| first_date(text, &ISSUE_DATE_TABLE, 1, 0.90, "issue_date_table"))
            .or_else(|| first_date(text, &ISSUE_DATE_TRAILING, 1, 0.95, "issue_date_trailing"))
            .or_else(|| first_date(text, &ISSUE_DATE_BELOW, 1, 0.95, "issue_date_below"))
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_TOKEN
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let date = parse_date(m.as_str())?;
                Some(ExtractionMatch::new(date, 0.9, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

/// Extracted dates of a policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyDates {
    pub start: Option<ExtractionMatch<NaiveDate>>,
    pub end: Option<ExtractionMatch<NaiveDate>>,
    pub issue: Option<ExtractionMatch<NaiveDate>>,
}

/// Extract start, end and issue dates from policy text.
pub fn extract_period(text: &str) -> PolicyDates {
    let extractor = DateExtractor::new();
    let start = extractor.extract_start_date(text);
    let end = extractor.extract_end_date(text, start.as_ref().map(|m| m.value));
    let issue = extractor.extract_issue_date(text);

    PolicyDates { start, end, issue }
}
