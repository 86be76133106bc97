//! Business rules over a finished policy record.

use chrono::{Local, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::policy::{Field, PolicyCategory, PolicyRecord};

/// Findings of one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Rule violations that block success.
    pub errors: Vec<String>,
    /// Plausibility concerns.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Policy record validator.
///
/// Every rule runs on every record; findings accumulate.
pub struct Validator {
    reference_date: Option<NaiveDate>,
}

impl Validator {
    /// Validator that compares dates against today.
    pub fn new() -> Self {
        Self { reference_date: None }
    }

    /// Compare dates against a fixed day instead of today.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Validate a record.
    ///
    /// Fills in `period.duration_days` when both dates are known; nothing
    /// else in the record is touched.
    pub fn validate(&self, record: &mut PolicyRecord) -> ValidationReport {
        let today = self
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());
        let mut report = ValidationReport::default();

        record.period.duration_days = record.period.span_days();

        check_required(record, &mut report);
        check_period(record, today, &mut report);
        check_premium(record, &mut report);
        check_vehicle(record, &mut report);
        check_insured(record, &mut report);
        check_policy_number(record, &mut report);
        check_confidence(record, &mut report);

        if record.metadata.is_cancellation {
            report.warn("cancellation or endorsement document: negative amounts were normalized");
        }

        report
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

fn check_required(record: &PolicyRecord, report: &mut ValidationReport) {
    if !record.issuer.is_known() {
        report.error("issuer not detected");
    }
    if record.policy_number.is_none() {
        report.error("policy number not found");
    }
    if record.period.start_date.is_none() {
        report.error("start date not found");
    }
    if record.period.end_date.is_none() {
        report.error("end date not found");
    }
    if record.premium.net.is_none() && record.premium.gross.is_none() {
        report.error("premium not found");
    }
    if record.category.requires_plate() && record.plate().is_none() {
        report.error(format!("plate number not found for {} policy", record.category));
    }
}

fn check_period(record: &PolicyRecord, today: NaiveDate, report: &mut ValidationReport) {
    let period = &record.period;

    if let Some(start) = period.start_date {
        if today.checked_add_months(Months::new(24)).is_some_and(|limit| start > limit) {
            report.warn("start date is more than 2 years in the future");
        }
        if today.checked_sub_months(Months::new(120)).is_some_and(|limit| start < limit) {
            report.warn("start date is more than 10 years in the past");
        }
    }

    if let (Some(start), Some(end)) = (period.start_date, period.end_date) {
        let days = (end - start).num_days();
        if end < start {
            report.error("end date is before start date");
        } else if days < 1 {
            if record.metadata.is_cancellation {
                report.warn("policy duration is less than one day on a cancellation document");
            } else {
                report.error("policy duration is less than one day");
            }
        }

        if start.checked_add_months(Months::new(60)).is_some_and(|limit| end > limit) {
            report.warn("policy duration exceeds 5 years");
        }
    }

    if let Some(issue) = period.issue_date {
        if let Some(start) = period.start_date {
            if (issue - start).num_days() > 30 {
                report.warn("issue date is more than 30 days after start date");
            }
        }
        if issue > today {
            report.warn("issue date is in the future");
        }
        if today.checked_sub_months(Months::new(120)).is_some_and(|limit| issue < limit) {
            report.warn("issue date is more than 10 years old");
        }
    }
}

fn check_premium(record: &PolicyRecord, report: &mut ValidationReport) {
    let premium = &record.premium;
    let ceiling = Decimal::from(1_000_000);

    for field in &record.metadata.reversed_amounts {
        report.warn(format!("{} was negative in the source, possible cancellation", field));
    }

    let amounts = [
        (Field::NetPremium, premium.net),
        (Field::GrossPremium, premium.gross),
        (Field::Tax, premium.tax),
    ];
    for (field, amount) in amounts {
        let Some(amount) = amount else { continue };
        if amount.is_zero() {
            report.warn(format!("{} is zero", field));
        }
        if field != Field::Tax && amount > ceiling {
            report.warn(format!("{} exceeds 1,000,000 TL", field));
        }
    }

    let (Some(net), Some(gross)) = (premium.net, premium.gross) else {
        return;
    };

    if net.is_zero() && gross.is_zero() {
        report.warn("both premiums are zero, possible endorsement");
    }
    if gross < net {
        report.warn("gross premium is less than net premium, possible cancellation");
    }
    if net > Decimal::ZERO && (gross - net) / net * Decimal::from(100) > Decimal::from(50) {
        report.warn("gross premium exceeds net premium by more than 50%");
    }
}

fn check_vehicle(record: &PolicyRecord, report: &mut ValidationReport) {
    if record.category == PolicyCategory::PersonalAccident && record.plate().is_none() {
        report.warn("plate number not found for personal accident policy");
    }

    let Some(plate) = record.plate() else {
        return;
    };
    let cleaned: String = plate.chars().filter(|c| !c.is_whitespace()).collect();

    if !(6..=8).contains(&cleaned.chars().count()) {
        report.warn(format!("plate number {} has an unusual length", plate));
    }

    match cleaned.get(..2).and_then(|code| code.parse::<u32>().ok()) {
        None => report.warn(format!("plate number {} has an invalid province code", plate)),
        Some(code) if !(1..=81).contains(&code) => {
            report.warn(format!("plate province code {:02} is outside 01-81", code))
        }
        Some(_) => {}
    }
}

fn check_insured(record: &PolicyRecord, report: &mut ValidationReport) {
    if let Some(name) = &record.insured.name {
        if name.split_whitespace().count() == 1 {
            report.warn("insured name has a single word");
        }
        let len = name.chars().count();
        if !(5..=100).contains(&len) {
            report.warn("insured name length is unusual");
        }
    }

    // Extracted ids are already checksum verified; this also covers records
    // built by hand.
    if let Some(id) = &record.insured.national_id {
        if id.len() != 11 || !id.bytes().all(|b| b.is_ascii_digit()) || id.starts_with('0') {
            report.error("national id has an invalid format");
        }
    }
}

fn check_policy_number(record: &PolicyRecord, report: &mut ValidationReport) {
    if let Some(number) = &record.policy_number {
        if !(6..=20).contains(&number.chars().count()) {
            report.warn("policy number length is unusual");
        }
    }
}

fn check_confidence(record: &PolicyRecord, report: &mut ValidationReport) {
    let confidence = record.metadata.confidence;
    if confidence < 0.5 {
        report.warn(format!("extraction confidence {:.2} is very low", confidence));
    } else if confidence < 0.7 {
        report.warn(format!("extraction confidence {:.2} is low", confidence));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::policy::{Issuer, Vehicle};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn validator() -> Validator {
        Validator::new().with_reference_date(date(2025, 6, 1))
    }

    fn complete_record() -> PolicyRecord {
        let mut record = PolicyRecord::new();
        record.issuer = Issuer::Allianz;
        record.policy_number = Some("123456789".to_string());
        record.period.start_date = Some(date(2025, 1, 1));
        record.period.end_date = Some(date(2026, 1, 1));
        record.period.issue_date = Some(date(2024, 12, 28));
        record.premium.net = Some(Decimal::new(100000, 2));
        record.premium.gross = Some(Decimal::new(120000, 2));
        record.insured.name = Some("Ahmet Yılmaz".to_string());
        record.metadata.confidence = 0.9;
        record
    }

    #[test]
    fn test_complete_record_is_valid() {
        let mut record = complete_record();
        let report = validator().validate(&mut record);

        assert_eq!(report, ValidationReport::default());
        assert!(report.is_valid());
        assert_eq!(record.period.duration_days, Some(365));
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let mut record = PolicyRecord::new();
        let report = validator().validate(&mut record);

        assert_eq!(
            report.errors,
            vec![
                "issuer not detected",
                "policy number not found",
                "start date not found",
                "end date not found",
                "premium not found",
            ]
        );
        assert!(report.warnings.contains(&"extraction confidence 0.00 is very low".to_string()));
    }

    #[test]
    fn test_plate_required_for_traffic() {
        let mut record = complete_record();
        record.category = PolicyCategory::Traffic;
        let report = validator().validate(&mut record);
        assert_eq!(report.errors, vec!["plate number not found for Trafik policy"]);

        record.vehicle = Some(Vehicle {
            plate: Some("34 ABC 123".to_string()),
            ..Default::default()
        });
        assert!(validator().validate(&mut record).is_valid());
    }

    #[test]
    fn test_personal_accident_plate_is_a_warning() {
        let mut record = complete_record();
        record.category = PolicyCategory::PersonalAccident;
        let report = validator().validate(&mut record);

        assert!(report.is_valid());
        assert!(report
            .warnings
            .contains(&"plate number not found for personal accident policy".to_string()));
    }

    #[test]
    fn test_period_errors() {
        let mut record = complete_record();
        record.period.end_date = Some(date(2024, 12, 1));
        let report = validator().validate(&mut record);
        assert_eq!(report.errors, vec!["end date is before start date"]);
        assert_eq!(record.period.duration_days, Some(-31));

        record.period.end_date = record.period.start_date;
        let report = validator().validate(&mut record);
        assert_eq!(report.errors, vec!["policy duration is less than one day"]);

        record.metadata.is_cancellation = true;
        let report = validator().validate(&mut record);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .contains(&"policy duration is less than one day on a cancellation document".to_string()));
    }

    #[test]
    fn test_date_plausibility_warnings() {
        let mut record = complete_record();
        record.period.start_date = Some(date(2028, 1, 1));
        record.period.end_date = Some(date(2034, 1, 1));
        record.period.issue_date = Some(date(2028, 3, 1));
        let report = validator().validate(&mut record);

        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "start date is more than 2 years in the future",
                "policy duration exceeds 5 years",
                "issue date is more than 30 days after start date",
                "issue date is in the future",
            ]
        );
    }

    #[test]
    fn test_premium_warnings() {
        let mut record = complete_record();
        record.premium.gross = Some(Decimal::new(50000, 2));
        let report = validator().validate(&mut record);
        assert_eq!(
            report.warnings,
            vec!["gross premium is less than net premium, possible cancellation"]
        );

        record.premium.gross = Some(Decimal::new(200000, 2));
        let report = validator().validate(&mut record);
        assert_eq!(
            report.warnings,
            vec!["gross premium exceeds net premium by more than 50%"]
        );

        record.premium.net = Some(Decimal::ZERO);
        record.premium.gross = Some(Decimal::ZERO);
        let report = validator().validate(&mut record);
        assert_eq!(
            report.warnings,
            vec![
                "net_premium is zero",
                "gross_premium is zero",
                "both premiums are zero, possible endorsement",
            ]
        );
    }

    #[test]
    fn test_reversed_amount_is_a_warning() {
        let mut record = complete_record();
        record.premium.net = None;
        record.premium.gross = Some(Decimal::new(50000, 2));
        record.metadata.reversed_amounts.push(Field::GrossPremium);
        record.metadata.is_cancellation = true;
        let report = validator().validate(&mut record);

        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![
                "gross_premium was negative in the source, possible cancellation",
                "cancellation or endorsement document: negative amounts were normalized",
            ]
        );
    }

    #[test]
    fn test_plate_warnings() {
        let mut record = complete_record();
        record.vehicle = Some(Vehicle {
            plate: Some("95 AB 123".to_string()),
            ..Default::default()
        });
        let report = validator().validate(&mut record);
        assert_eq!(report.warnings, vec!["plate province code 95 is outside 01-81"]);

        record.vehicle = Some(Vehicle {
            plate: Some("34 ABC 1234".to_string()),
            ..Default::default()
        });
        let report = validator().validate(&mut record);
        assert_eq!(report.warnings, vec!["plate number 34 ABC 1234 has an unusual length"]);
    }

    #[test]
    fn test_insured_checks() {
        let mut record = complete_record();
        record.insured.name = Some("Ali".to_string());
        record.insured.national_id = Some("01234567890".to_string());
        let report = validator().validate(&mut record);

        assert_eq!(report.errors, vec!["national id has an invalid format"]);
        assert_eq!(
            report.warnings,
            vec!["insured name has a single word", "insured name length is unusual"]
        );
    }

    #[test]
    fn test_confidence_and_policy_number_warnings() {
        let mut record = complete_record();
        record.policy_number = Some("12345".to_string());
        record.metadata.confidence = 0.6;
        let report = validator().validate(&mut record);

        assert_eq!(
            report.warnings,
            vec!["policy number length is unusual", "extraction confidence 0.60 is low"]
        );
    }
}
