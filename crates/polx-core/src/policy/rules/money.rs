//! Premium and tax extraction for insurance policies.

use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use super::patterns::{
    extract_by_keyword, mentions_issuer, AMOUNT_IN_TL, BSMV_TAX, EXPENSE_TAX, GROSS_CONTRIBUTION,
    GROSS_PREMIUM, INSTALLMENT_ROW, MONEY_TOKEN, NET_CONTRIBUTION, NET_PREMIUM, NET_PREMIUM_EVERY,
    NET_SHORT, PAYABLE_AMOUNT, PAYABLE_PREMIUM, PAYABLE_PREMIUM_EVERY, PAYABLE_PREMIUM_REGION,
    PAYABLE_SHORT, POLICY_PREMIUM, PREMIUM_AMOUNT, PREMIUM_BEFORE_DATED_HEADER,
    PREMIUM_BEFORE_HEADER, PRE_TAX_PREMIUM, PRE_TAX_PREMIUM_TABLE, TOTAL_PREMIUM,
};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::policy::{Field, Issuer};

/// A parsed money value.
///
/// `value` is always the magnitude; `negative` remembers a leading minus,
/// which appears on cancellation and endorsement documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount {
    pub value: Decimal,
    pub negative: bool,
}

/// Parse a Turkish (`1.234,56`) or international (`1,234.56`) amount.
pub fn parse_amount(s: &str) -> Option<Amount> {
    let trimmed = s.trim();
    let negative = trimmed.starts_with('-');

    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == ',' || c == '.');
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let comma_pos = cleaned.rfind(',');
    let dot_pos = cleaned.rfind('.');
    let normalized = match (comma_pos, dot_pos) {
        // Comma is the decimal separator when it comes last
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), None) => cleaned.replace('.', "").replace(',', "."),
        // Lone dot followed by three digits is a thousands separator: "1.200"
        (None, Some(d)) if cleaned.len() - d == 4 => cleaned.replace('.', ""),
        _ => cleaned.replace(',', ""),
    };

    let value = Decimal::from_str(&normalized).ok()?.abs();
    Some(Amount {
        value,
        negative: negative && !value.is_zero(),
    })
}

/// Format an amount in Turkish style (`1.234,56`).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return s;
    };

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

/// First amount captured by `group` of `pattern` that parses.
fn first_amount(
    text: &str,
    pattern: &Regex,
    group: usize,
    confidence: f32,
    rule: &'static str,
) -> Option<ExtractionMatch<Amount>> {
    pattern.captures_iter(text).find_map(|caps| {
        let m = caps.get(group)?;
        let amount = parse_amount(m.as_str())?;
        Some(
            ExtractionMatch::new(amount, confidence, m.as_str())
                .with_position(m.start(), m.end())
                .with_rule(rule),
        )
    })
}

/// Issuer-specific rule taking the *last* labeled value in the document.
///
/// Some issuers print the same label in a preliminary section and again in
/// the authoritative summary table at the end.
pub struct LastMatchOverride {
    pub issuer: Issuer,
    pub field: Field,
    pub confidence: f32,
    pub rule: &'static str,
    pattern: fn() -> &'static Regex,
}

impl LastMatchOverride {
    /// Apply the override when the document mentions its issuer.
    pub fn apply(&self, text: &str) -> Option<ExtractionMatch<Amount>> {
        if !mentions_issuer(text, self.issuer) {
            return None;
        }

        let m = (self.pattern)()
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .last()?;
        let amount = parse_amount(m.as_str())?;
        Some(
            ExtractionMatch::new(amount, self.confidence, m.as_str())
                .with_position(m.start(), m.end())
                .with_rule(self.rule),
        )
    }
}

fn net_premium_every() -> &'static Regex {
    &NET_PREMIUM_EVERY
}

fn payable_premium_every() -> &'static Regex {
    &PAYABLE_PREMIUM_EVERY
}

/// Every issuer-specific "pick the last match" rule.
pub static LAST_MATCH_OVERRIDES: &[LastMatchOverride] = &[
    LastMatchOverride {
        issuer: Issuer::Axa,
        field: Field::NetPremium,
        confidence: 0.98,
        rule: "axa_last_net_premium",
        pattern: net_premium_every,
    },
    LastMatchOverride {
        issuer: Issuer::Axa,
        field: Field::GrossPremium,
        confidence: 0.98,
        rule: "axa_last_payable_premium",
        pattern: payable_premium_every,
    },
];

fn apply_overrides(text: &str, field: Field) -> Option<ExtractionMatch<Amount>> {
    LAST_MATCH_OVERRIDES
        .iter()
        .filter(|o| o.field == field)
        .find_map(|o| o.apply(text))
}

/// Labels tried by the gross premium proximity fallback.
const GROSS_KEYWORDS: &[&str] = &["Brüt Prim", "Ödenecek Prim", "Ödenecek Tutar", "Ödenecek"];

/// Money field extractor.
pub struct MoneyExtractor {
    keyword_window: usize,
}

impl MoneyExtractor {
    pub fn new() -> Self {
        Self { keyword_window: 50 }
    }

    /// Set the character window of the keyword-proximity fallback.
    pub fn with_keyword_window(mut self, chars: usize) -> Self {
        self.keyword_window = chars;
        self
    }

    fn by_keyword(&self, text: &str, keyword: &str, confidence: f32) -> Option<ExtractionMatch<Amount>> {
        let raw = extract_by_keyword(text, keyword, self.keyword_window)?;
        let amount = parse_amount(raw)?;
        Some(ExtractionMatch::new(amount, confidence, raw).with_rule("keyword_proximity"))
    }

    /// Net premium (before tax).
    pub fn extract_net_premium(&self, text: &str) -> Option<ExtractionMatch<Amount>> {
        first_amount(text, &NET_CONTRIBUTION, 1, 0.95, "net_contribution")
            .or_else(|| apply_overrides(text, Field::NetPremium))
            .or_else(|| first_amount(text, &PRE_TAX_PREMIUM_TABLE, 1, 0.95, "pre_tax_premium_table"))
            .or_else(|| first_amount(text, &PRE_TAX_PREMIUM, 1, 0.95, "pre_tax_premium"))
            .or_else(|| first_amount(text, &NET_PREMIUM, 1, 0.95, "net_premium"))
            .or_else(|| first_amount(text, &NET_SHORT, 1, 0.90, "net_short"))
            .or_else(|| self.by_keyword(text, "Net Prim", 0.85))
    }

    /// Gross premium, the amount payable.
    pub fn extract_gross_premium(&self, text: &str) -> Option<ExtractionMatch<Amount>> {
        first_amount(text, &PREMIUM_BEFORE_HEADER, 1, 0.95, "premium_before_header")
            .or_else(|| {
                first_amount(text, &PREMIUM_BEFORE_DATED_HEADER, 1, 0.98, "premium_before_dated_header")
            })
            .or_else(|| first_amount(text, &PREMIUM_AMOUNT, 1, 0.95, "premium_amount"))
            .or_else(|| first_amount(text, &TOTAL_PREMIUM, 1, 0.95, "total_premium"))
            .or_else(|| first_amount(text, &GROSS_CONTRIBUTION, 1, 0.95, "gross_contribution"))
            .or_else(|| self.installment_total(text))
            .or_else(|| first_amount(text, &POLICY_PREMIUM, 1, 0.95, "policy_premium"))
            .or_else(|| apply_overrides(text, Field::GrossPremium))
            .or_else(|| first_amount(text, &PAYABLE_PREMIUM, 1, 0.95, "payable_premium"))
            .or_else(|| first_amount(text, &PAYABLE_AMOUNT, 1, 0.95, "payable_amount"))
            .or_else(|| first_amount(text, &GROSS_PREMIUM, 1, 0.95, "gross_premium"))
            .or_else(|| first_amount(text, &PAYABLE_SHORT, 1, 0.90, "payable_short"))
            .or_else(|| self.largest_payable_in_region(text))
            .or_else(|| {
                if mentions_issuer(text, Issuer::Axa) {
                    return None;
                }
                GROSS_KEYWORDS
                    .iter()
                    .find_map(|keyword| self.by_keyword(text, keyword, 0.85))
            })
    }

    /// Insurance transaction tax (gider vergisi / BSMV).
    pub fn extract_tax(&self, text: &str) -> Option<ExtractionMatch<Amount>> {
        first_amount(text, &EXPENSE_TAX, 1, 0.90, "expense_tax")
            .or_else(|| first_amount(text, &BSMV_TAX, 1, 0.85, "bsmv_tax"))
            .or_else(|| self.by_keyword(text, "Gider Vergisi", 0.80))
    }

    /// "Peşin a b c" rows: the third column is the total payable.
    fn installment_total(&self, text: &str) -> Option<ExtractionMatch<Amount>> {
        INSTALLMENT_ROW.captures_iter(text).find_map(|caps| {
            let m = caps.get(3)?;
            let amount = parse_amount(m.as_str())?;
            (amount.value > Decimal::ZERO).then(|| {
                ExtractionMatch::new(amount, 0.90, m.as_str())
                    .with_position(m.start(), m.end())
                    .with_rule("installment_total")
            })
        })
    }

    /// Largest TL value shortly after an "Ödenecek Prim" header.
    fn largest_payable_in_region(&self, text: &str) -> Option<ExtractionMatch<Amount>> {
        let region = PAYABLE_PREMIUM_REGION.find(text)?;
        let largest = AMOUNT_IN_TL
            .captures_iter(region.as_str())
            .filter_map(|caps| {
                let m = caps.get(1)?;
                parse_amount(m.as_str()).map(|amount| (amount, m.as_str()))
            })
            .max_by(|a, b| a.0.value.cmp(&b.0.value))?;

        let (amount, source) = largest;
        (amount.value > Decimal::from(100)).then(|| {
            ExtractionMatch::new(amount, 0.90, source).with_rule("largest_payable_in_region")
        })
    }
}

impl Default for MoneyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MoneyExtractor {
    type Output = ExtractionMatch<Amount>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MONEY_TOKEN
            .captures_iter(text)
            .filter_map(|caps| {
                let m = caps.get(1)?;
                let amount = parse_amount(m.as_str())?;
                Some(ExtractionMatch::new(amount, 0.7, m.as_str()).with_position(m.start(), m.end()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("1.234,56").unwrap().value, dec("1234.56"));
        assert_eq!(parse_amount("1,234.56").unwrap().value, dec("1234.56"));
        assert_eq!(parse_amount("1234,56").unwrap().value, dec("1234.56"));
        assert_eq!(parse_amount("1234.56").unwrap().value, dec("1234.56"));
        assert_eq!(parse_amount("12.345.678,90").unwrap().value, dec("12345678.90"));
        assert_eq!(parse_amount("1.200").unwrap().value, dec("1200"));
        assert_eq!(parse_amount("500,00.").unwrap().value, dec("500"));
        assert_eq!(parse_amount(".,"), None);
    }

    #[test]
    fn test_parse_amount_negative() {
        let amount = parse_amount("-500,00").unwrap();
        assert_eq!(amount.value, dec("500.00"));
        assert!(amount.negative);

        assert!(!parse_amount("-0,00").unwrap().negative);
        assert!(!parse_amount("500,00").unwrap().negative);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.56")), "1.234,56");
        assert_eq!(format_amount(dec("12345678.9")), "12.345.678,90");
        assert_eq!(format_amount(dec("12")), "12,00");
    }

    #[test]
    fn test_gross_premium_labeled() {
        let extractor = MoneyExtractor::new();
        let found = extractor.extract_gross_premium("Brüt Prim: 1.200,00 TL").unwrap();
        assert_eq!(found.value.value, dec("1200.00"));
        assert_eq!(found.confidence, 0.95);
        assert_eq!(found.rule, "gross_premium");

        let upper = extractor.extract_gross_premium("BRÜT PRİM 2.500,50").unwrap();
        assert_eq!(upper.value.value, dec("2500.50"));
    }

    #[test]
    fn test_gross_premium_negative_source() {
        let extractor = MoneyExtractor::new();
        let found = extractor.extract_gross_premium("Brüt Prim: -500,00").unwrap();
        assert_eq!(found.value.value, dec("500.00"));
        assert!(found.value.negative);
    }

    #[test]
    fn test_installment_row_takes_third_value() {
        let extractor = MoneyExtractor::new();
        let found = extractor
            .extract_gross_premium("Taksit Peşin 0,00 11.830,00 11.830,00")
            .unwrap();
        assert_eq!(found.value.value, dec("11830.00"));
        assert_eq!(found.confidence, 0.90);
        assert_eq!(found.rule, "installment_total");
    }

    #[test]
    fn test_axa_takes_last_payable_premium() {
        let text = "AXA SİGORTA A.Ş.\nÖdenecek Prim 100,00\n...\nÖdenecek Prim 1.450,75";
        let found = LAST_MATCH_OVERRIDES[1].apply(text).unwrap();
        assert_eq!(found.value.value, dec("1450.75"));

        let gross = MoneyExtractor::new().extract_gross_premium(text).unwrap();
        assert_eq!(gross.value.value, dec("1450.75"));
        assert_eq!(gross.confidence, 0.98);
    }

    #[test]
    fn test_axa_override_needs_issuer() {
        let text = "Ödenecek Prim 100,00\nÖdenecek Prim 1.450,75";
        assert!(LAST_MATCH_OVERRIDES[1].apply(text).is_none());

        let gross = MoneyExtractor::new().extract_gross_premium(text).unwrap();
        assert_eq!(gross.value.value, dec("100.00"));
    }

    #[test]
    fn test_axa_takes_last_net_premium() {
        let text = "AXA\nNet Prim 10,00\nözet\nNet Prim 900,00";
        let net = MoneyExtractor::new().extract_net_premium(text).unwrap();
        assert_eq!(net.value.value, dec("900.00"));
        assert_eq!(net.rule, "axa_last_net_premium");
    }

    #[test]
    fn test_net_premium_variants() {
        let extractor = MoneyExtractor::new();

        let net = extractor.extract_net_premium("Net Prim: 1.000,00").unwrap();
        assert_eq!(net.value.value, dec("1000.00"));
        assert_eq!(net.confidence, 0.95);

        let pre_tax = extractor
            .extract_net_premium("Vergi Öncesi Prim YSV* BSM Vergisi* Tutar\n4.525,97 TL")
            .unwrap();
        assert_eq!(pre_tax.value.value, dec("4525.97"));

        let short = extractor.extract_net_premium("Net : 750,00").unwrap();
        assert_eq!(short.confidence, 0.90);
    }

    #[test]
    fn test_largest_payable_in_region() {
        let text = "ÖDENECEK PRİM\nPeşinat 50,00 TL\nToplam 3.210,40 TL";
        let found = MoneyExtractor::new().extract_gross_premium(text).unwrap();
        assert_eq!(found.value.value, dec("3210.40"));
        assert_eq!(found.rule, "largest_payable_in_region");
    }

    #[test]
    fn test_tax() {
        let extractor = MoneyExtractor::new();
        let tax = extractor.extract_tax("Gider Vergisi: 57,14").unwrap();
        assert_eq!(tax.value.value, dec("57.14"));
        assert_eq!(tax.confidence, 0.90);
        assert!(extractor.extract_tax("Prim 100,00").is_none());
    }

    #[test]
    fn test_extract_all_tokens() {
        let extractor = MoneyExtractor::new();
        let all = extractor.extract_all("Tutar 1.234,56 ve 99,90");
        let values: Vec<Decimal> = all.into_iter().map(|m| m.value.value).collect();
        assert_eq!(values, vec![dec("1234.56"), dec("99.90")]);
    }
}
