//! End-to-end extraction scenarios.

use chrono::NaiveDate;
use polx_core::policy::rules::{parse_amount, DateExtractor, FieldExtractor, NationalIdExtractor};
use polx_core::{Issuer, PolicyCategory, PolicyOrchestrator, PolicyPipeline};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

const ALLIANZ_POLICY: &str = "\
ALLIANZ SİGORTA A.Ş.
Allianz Müşteri Hizmetleri
Poliçe No: 123456789
Başlangıç Tarihi 01/01/2025
Bitiş Tarihi 01/01/2026
Brüt Prim: 1.200,00 TL
allianz.com.tr
ALLIANZ
";

const ANONYMOUS_POLICY: &str = "\
Sigorta Poliçesi
Başlangıç Tarihi 01/01/2025
Bitiş Tarihi 01/01/2026
Brüt Prim: 1.200,00 TL
";

#[test]
fn test_allianz_policy_succeeds() {
    let result = PolicyPipeline::new().process(ALLIANZ_POLICY, Some("allianz.txt"), Some(1));
    let record = result.record.as_ref().unwrap();

    assert_eq!(result.errors, Vec::<String>::new());
    assert!(result.success);
    assert!(result.confidence >= 0.7, "confidence {}", result.confidence);
    assert_eq!(record.issuer, Issuer::Allianz);
    assert_eq!(record.policy_number.as_deref(), Some("123456789"));
    assert_eq!(record.period.start_date, NaiveDate::from_ymd_opt(2025, 1, 1));
    assert_eq!(record.period.end_date, NaiveDate::from_ymd_opt(2026, 1, 1));
    assert_eq!(record.premium.gross, Some(Decimal::new(120000, 2)));
    assert_eq!(record.period.duration_days, Some(365));
}

#[test]
fn test_missing_issuer_and_policy_number_fail() {
    let result = PolicyPipeline::new().process(ANONYMOUS_POLICY, None, None);

    assert!(!result.success);
    assert!(result.errors.contains(&"issuer not detected".to_string()));
    assert!(result.errors.contains(&"policy number not found".to_string()));
}

#[test]
fn test_cancellation_normalizes_negative_premium() {
    let text = "POLİÇE İPTAL ZEYLİ\nBrüt Prim: -500,00\n";
    let result = PolicyPipeline::new().process(text, None, None);
    let record = result.record.as_ref().unwrap();

    assert_eq!(record.premium.gross, Some(Decimal::new(50000, 2)));
    assert!(record.metadata.is_cancellation);
    assert!(result
        .warnings
        .contains(&"gross_premium was negative in the source, possible cancellation".to_string()));
    assert!(!result.errors.iter().any(|e| e.contains("negative")));
}

#[test]
fn test_orchestration_is_idempotent() {
    let orchestrator = PolicyOrchestrator::new();
    let first = orchestrator.extract(ALLIANZ_POLICY);
    let second = orchestrator.extract(ALLIANZ_POLICY);

    assert_eq!(first.record, second.record);
    assert_eq!(
        serde_json::to_string(&first.record).unwrap(),
        serde_json::to_string(&second.record).unwrap()
    );
}

#[test]
fn test_money_normalization() {
    let expected = Decimal::new(123456, 2);
    assert_eq!(parse_amount("1.234,56").unwrap().value, expected);
    assert_eq!(parse_amount("1,234.56").unwrap().value, expected);

    let reversed = parse_amount("-500,00").unwrap();
    assert_eq!(reversed.value, Decimal::new(50000, 2));
    assert!(reversed.negative);
}

#[test]
fn test_start_date_plausibility() {
    let extractor = DateExtractor::new();
    assert!(extractor.extract_start_date("Başlangıç Tarihi 07/07/1899").is_none());
    assert_eq!(
        extractor
            .extract_start_date("Başlangıç Tarihi 07/07/2025")
            .map(|m| m.value),
        NaiveDate::from_ymd_opt(2025, 7, 7)
    );
}

/// Check digits per the national id algorithm.
fn with_check_digits(prefix: &[u32; 9]) -> String {
    let odd: u32 = prefix.iter().step_by(2).sum();
    let even: u32 = prefix.iter().skip(1).step_by(2).sum();
    let d10 = ((odd * 7) as i64 - even as i64).rem_euclid(10) as u32;
    let d11 = (prefix.iter().sum::<u32>() + d10) % 10;

    prefix
        .iter()
        .chain([d10, d11].iter())
        .map(|d| char::from_digit(*d, 10).unwrap())
        .collect()
}

#[test]
fn test_national_id_checksum_strength() {
    let extractor = NationalIdExtractor::new();
    let mut mutations = 0;
    let mut rejected = 0;

    for seed in 0..200u32 {
        let mut prefix = [0u32; 9];
        prefix[0] = seed % 9 + 1;
        for (i, digit) in prefix.iter_mut().enumerate().skip(1) {
            *digit = (seed * 7 + i as u32 * 13 + seed / 3) % 10;
        }
        let id = with_check_digits(&prefix);
        let found = extractor.extract(&format!("TC Kimlik No: {}", id));
        assert_eq!(found.map(|m| m.value), Some(id.clone()));

        for position in 1..11 {
            for replacement in '0'..='9' {
                let mut digits: Vec<char> = id.chars().collect();
                if digits[position] == replacement {
                    continue;
                }
                digits[position] = replacement;
                let mutated: String = digits.into_iter().collect();

                mutations += 1;
                if !polx_core::policy::rules::validate_national_id(&mutated) {
                    rejected += 1;
                }
            }
        }
    }

    assert!(rejected as f64 / mutations as f64 > 0.9);
}

#[test]
fn test_traffic_policy_without_plate_fails() {
    let text = "\
ALLIANZ SİGORTA
Zorunlu Trafik Sigortası
Poliçe No: 123456789
Başlangıç Tarihi 01/01/2025
Bitiş Tarihi 01/01/2026
Brüt Prim: 1.200,00 TL
";
    let result = PolicyPipeline::new().process(text, None, None);
    let record = result.record.as_ref().unwrap();

    assert_eq!(record.category, PolicyCategory::Traffic);
    assert!(!result.success);
    assert_eq!(result.errors, vec!["plate number not found for Trafik policy"]);
}
