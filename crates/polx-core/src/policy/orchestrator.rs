//! Runs the detector and every field extractor over one document.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use super::detector::{
    detect_cancellation, detect_category, detect_issuer, CategoryDetection, IssuerDetection,
};
use super::rules::{
    contact, ExtractionMatch, FieldExtractor, MoneyExtractor, NameExtractor, NationalIdExtractor,
    PlateExtractor, PolicyNumberExtractor, VehicleExtractor, DateExtractor,
};
use crate::error::ExtractionError;
use crate::models::policy::{Field, PolicyRecord, Vehicle};

/// Tag stored in the record metadata.
pub const EXTRACTION_METHOD: &str = "pattern-rules";

/// Fields that drive most of the overall confidence.
const CRITICAL_FIELDS: &[Field] = &[
    Field::Issuer,
    Field::PolicyNumber,
    Field::StartDate,
    Field::EndDate,
    Field::GrossPremium,
];

/// Fields that contribute the remaining share.
const IMPORTANT_FIELDS: &[Field] = &[Field::InsuredName, Field::NetPremium, Field::IssueDate];

const CRITICAL_WEIGHT: f32 = 0.7;
const IMPORTANT_WEIGHT: f32 = 0.3;

/// Record built from one document plus anything that went wrong on the way.
#[derive(Debug, Clone, Default)]
pub struct Orchestration {
    pub record: PolicyRecord,
    pub warnings: Vec<String>,
}

/// Policy extraction orchestrator.
pub struct PolicyOrchestrator {
    dates: DateExtractor,
    money: MoneyExtractor,
    policy_number: PolicyNumberExtractor,
    name: NameExtractor,
    national_id: NationalIdExtractor,
    plate: PlateExtractor,
    vehicle: VehicleExtractor,
}

impl PolicyOrchestrator {
    /// Create an orchestrator with default settings.
    pub fn new() -> Self {
        Self {
            dates: DateExtractor::new(),
            money: MoneyExtractor::new(),
            policy_number: PolicyNumberExtractor::new(),
            name: NameExtractor::new(),
            national_id: NationalIdExtractor::new(),
            plate: PlateExtractor::new(),
            vehicle: VehicleExtractor::new(),
        }
    }

    /// Set the character window of the money keyword fallback.
    pub fn with_keyword_window(mut self, chars: usize) -> Self {
        self.money = MoneyExtractor::new().with_keyword_window(chars);
        self
    }

    /// Fix the year used to bound vehicle model years.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.vehicle = VehicleExtractor::new().with_current_year(year);
        self
    }

    /// Build a policy record from document text.
    ///
    /// Never fails: missing fields stay empty and a panic inside one field's
    /// extraction becomes a warning.
    pub fn extract(&self, text: &str) -> Orchestration {
        let mut out = Orchestration::default();
        if text.trim().is_empty() {
            warn!("empty document text");
            out.warnings.push(ExtractionError::EmptyText.to_string());
            return out;
        }

        let Orchestration { record, warnings } = &mut out;
        record.metadata.extraction_method = Some(EXTRACTION_METHOD.to_string());

        // Classification
        let issuer = isolate(Field::Issuer, warnings, || detect_issuer(text))
            .unwrap_or_else(IssuerDetection::unknown);
        if issuer.issuer.is_known() {
            record.issuer = issuer.issuer;
            record.issuer_name = issuer.display_name().map(str::to_string);
            record.set_confidence(Field::Issuer, issuer.confidence);
        } else {
            warn!("issuer not detected");
        }
        observe_detection(Field::Issuer, issuer.issuer.is_known(), issuer.confidence, issuer.keyword);

        let category = isolate(Field::Category, warnings, || detect_category(text))
            .unwrap_or_else(CategoryDetection::unknown);
        if category.category.is_known() {
            record.category = category.category;
            record.set_confidence(Field::Category, category.confidence);
        } else {
            warn!("policy category not detected");
        }
        observe_detection(
            Field::Category,
            category.category.is_known(),
            category.confidence,
            category.keyword,
        );

        record.metadata.is_cancellation =
            isolate(Field::Category, warnings, || detect_cancellation(text)).unwrap_or(false);

        // Identity
        if let Some(m) = run_field(Field::PolicyNumber, warnings, || self.policy_number.extract(text)) {
            record.set_confidence(Field::PolicyNumber, m.confidence);
            record.policy_number = Some(m.value);
        }

        // Period
        if let Some(m) = run_field(Field::StartDate, warnings, || self.dates.extract_start_date(text)) {
            record.set_confidence(Field::StartDate, m.confidence);
            record.period.start_date = Some(m.value);
        }
        let start = record.period.start_date;
        if let Some(m) = run_field(Field::EndDate, warnings, || self.dates.extract_end_date(text, start)) {
            record.set_confidence(Field::EndDate, m.confidence);
            record.period.end_date = Some(m.value);
        }
        if let Some(m) = run_field(Field::IssueDate, warnings, || self.dates.extract_issue_date(text)) {
            record.set_confidence(Field::IssueDate, m.confidence);
            record.period.issue_date = Some(m.value);
        }

        // Premium
        let premiums = [
            (Field::NetPremium, run_field(Field::NetPremium, warnings, || self.money.extract_net_premium(text))),
            (Field::GrossPremium, run_field(Field::GrossPremium, warnings, || self.money.extract_gross_premium(text))),
            (Field::Tax, run_field(Field::Tax, warnings, || self.money.extract_tax(text))),
        ];
        for (field, found) in premiums {
            let Some(m) = found else { continue };
            record.set_confidence(field, m.confidence);
            if m.value.negative {
                record.metadata.reversed_amounts.push(field);
            }
            let slot = match field {
                Field::NetPremium => &mut record.premium.net,
                Field::GrossPremium => &mut record.premium.gross,
                _ => &mut record.premium.tax,
            };
            *slot = Some(m.value.value);
        }

        // Insured party
        if let Some(m) = run_field(Field::InsuredName, warnings, || self.name.extract(text)) {
            record.set_confidence(Field::InsuredName, m.confidence);
            record.insured.name = Some(m.value);
        }
        if let Some(m) = run_field(Field::NationalId, warnings, || self.national_id.extract(text)) {
            record.set_confidence(Field::NationalId, m.confidence);
            record.insured.national_id = Some(m.value);
        }
        if let Some(m) = run_field(Field::Phone, warnings, || contact::extract_phone(text)) {
            record.set_confidence(Field::Phone, m.confidence);
            record.insured.phone = Some(m.value);
        }
        if let Some(m) = run_field(Field::Address, warnings, || contact::extract_address(text)) {
            record.set_confidence(Field::Address, m.confidence);
            record.insured.address = Some(m.value);
        }

        // Vehicle, only when the category describes one
        if record.category.is_vehicle_related() {
            let vehicle = self.extract_vehicle(text, record, warnings);
            record.vehicle = (!vehicle.is_empty()).then_some(vehicle);
        }

        record.metadata.confidence = overall_confidence(record);

        info!(
            issuer = %record.issuer,
            category = %record.category,
            confidence = record.metadata.confidence,
            warnings = warnings.len(),
            "policy extracted"
        );

        out
    }

    fn extract_vehicle(&self, text: &str, record: &mut PolicyRecord, warnings: &mut Vec<String>) -> Vehicle {
        let mut vehicle = Vehicle::default();

        if let Some(m) = run_field(Field::PlateNumber, warnings, || self.plate.extract(text)) {
            record.set_confidence(Field::PlateNumber, m.confidence);
            vehicle.plate = Some(m.value);
        }

        let Some(details) = isolate(Field::VehicleMake, warnings, || self.vehicle.extract_details(text)) else {
            return vehicle;
        };

        let mut take = |field: Field, found: Option<ExtractionMatch<String>>| {
            observe(field, &found);
            found.map(|m| {
                record.set_confidence(field, m.confidence);
                m.value
            })
        };
        vehicle.make = take(Field::VehicleMake, details.make);
        vehicle.model = take(Field::VehicleModel, details.model);
        vehicle.vehicle_type = take(Field::VehicleType, details.usage_type);
        vehicle.chassis_number = take(Field::ChassisNumber, details.chassis_number);
        vehicle.engine_number = take(Field::EngineNumber, details.engine_number);

        observe(Field::VehicleYear, &details.year);
        if let Some(m) = details.year {
            record.set_confidence(Field::VehicleYear, m.confidence);
            vehicle.year = Some(m.value);
        }

        vehicle
    }
}

impl Default for PolicyOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

/// Overall confidence of a record, rounded to two decimals.
///
/// 70% comes from the critical fields and 30% from the important ones,
/// averaged over the fields that are present. The plate is critical for
/// categories that require one. Each missing critical field costs half of
/// its share. When no important field is present the critical average
/// stands on its own.
pub fn overall_confidence(record: &PolicyRecord) -> f32 {
    let mut critical: Vec<Field> = CRITICAL_FIELDS.to_vec();
    if record.category.requires_plate() {
        critical.push(Field::PlateNumber);
    }

    let present = |fields: &[Field]| -> Vec<f32> {
        fields.iter().filter_map(|f| record.confidence_of(*f)).collect()
    };
    let average = |scores: &[f32]| -> Option<f32> {
        (!scores.is_empty()).then(|| scores.iter().sum::<f32>() / scores.len() as f32)
    };

    let critical_scores = present(&critical);
    let important_scores = present(IMPORTANT_FIELDS);

    let score = match (average(&critical_scores), average(&important_scores)) {
        (Some(c), Some(i)) => CRITICAL_WEIGHT * c + IMPORTANT_WEIGHT * i,
        (Some(c), None) => c,
        (None, Some(i)) => i,
        (None, None) => return 0.0,
    };

    let missing = critical.len() - critical_scores.len();
    let penalty = 1.0 - 0.5 * (missing as f32 / critical.len() as f32);

    ((score * penalty).clamp(0.0, 1.0) * 100.0).round() / 100.0
}

/// Run one step, turning a panic into a warning.
fn isolate<T>(field: Field, warnings: &mut Vec<String>, step: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(step)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let error = ExtractionError::Internal {
                field: field.to_string(),
                reason: panic_reason(payload.as_ref()),
            };
            warn!(field = %field, error = %error, "field extraction failed");
            warnings.push(error.to_string());
            None
        }
    }
}

fn run_field<T>(
    field: Field,
    warnings: &mut Vec<String>,
    step: impl FnOnce() -> Option<ExtractionMatch<T>>,
) -> Option<ExtractionMatch<T>> {
    let found = isolate(field, warnings, step).flatten();
    observe(field, &found);
    found
}

/// One structured event per extraction attempt.
fn observe<T>(field: Field, found: &Option<ExtractionMatch<T>>) {
    match found {
        Some(m) => debug!(
            field = %field,
            outcome = "matched",
            confidence = m.confidence,
            rule = m.rule,
            "field extraction"
        ),
        None => debug!(field = %field, outcome = "missing", confidence = 0.0, "field extraction"),
    }
}

fn observe_detection(field: Field, known: bool, confidence: f32, keyword: Option<&str>) {
    debug!(
        field = %field,
        outcome = if known { "matched" } else { "missing" },
        confidence,
        rule = keyword.unwrap_or(""),
        "field extraction"
    );
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::policy::{Issuer, PolicyCategory};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const TRAFFIC_POLICY: &str = "\
ANADOLU ANONİM TÜRK SİGORTA ŞİRKETİ
KARAYOLLARI MOTORLU ARAÇLAR ZORUNLU MALİ SORUMLULUK SİGORTASI - Zorunlu Trafik
Poliçe No: 4567891234
Başlangıç Tarihi: 15.03.2025
Bitiş Tarihi: 15.03.2026
Tanzim Tarihi: 14.03.2025
Adı Soyadı: Ayşe Kaya
TC Kimlik No: 10000000146
Plaka: 34ABC123
Marka : FIAT
Tipi : EGEA 1.3
Model Yılı : 2021
Net Prim: 2.000,00
Gider Vergisi: 100,00
Brüt Prim: 2.100,00 TL
";

    fn orchestrator() -> PolicyOrchestrator {
        PolicyOrchestrator::new().with_current_year(2025)
    }

    #[test]
    fn test_empty_text() {
        let out = orchestrator().extract("   \n\t ");
        assert_eq!(out.record, PolicyRecord::default());
        assert_eq!(out.warnings, vec!["document text is empty".to_string()]);
    }

    #[test]
    fn test_traffic_policy() {
        let out = orchestrator().extract(TRAFFIC_POLICY);
        let record = out.record;

        assert_eq!(record.issuer, Issuer::Anadolu);
        assert_eq!(record.issuer_name.as_deref(), Some("Anadolu Sigorta"));
        assert_eq!(record.category, PolicyCategory::Traffic);
        assert_eq!(record.policy_number.as_deref(), Some("4567891234"));
        assert_eq!(record.period.start_date, NaiveDate::from_ymd_opt(2025, 3, 15));
        assert_eq!(record.period.end_date, NaiveDate::from_ymd_opt(2026, 3, 15));
        assert_eq!(record.period.issue_date, NaiveDate::from_ymd_opt(2025, 3, 14));
        assert_eq!(record.premium.net, Some(Decimal::new(200000, 2)));
        assert_eq!(record.premium.gross, Some(Decimal::new(210000, 2)));
        assert_eq!(record.premium.tax, Some(Decimal::new(10000, 2)));
        assert_eq!(record.insured.name.as_deref(), Some("Ayşe Kaya"));
        assert_eq!(record.insured.national_id.as_deref(), Some("10000000146"));
        assert_eq!(record.plate(), Some("34 ABC 123"));

        let vehicle = record.vehicle.as_ref().unwrap();
        assert_eq!(vehicle.make.as_deref(), Some("FIAT"));
        assert_eq!(vehicle.year, Some(2021));

        assert_eq!(record.metadata.extraction_method.as_deref(), Some(EXTRACTION_METHOD));
        assert!(!record.metadata.is_cancellation);
        assert!(record.metadata.confidence >= 0.8);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_non_vehicle_policy_has_no_vehicle() {
        let text = "DASK Zorunlu Deprem Sigortası\nPoliçe No: 11223344\nPlaka: 34ABC123";
        let record = orchestrator().extract(text).record;
        assert_eq!(record.category, PolicyCategory::Earthquake);
        assert!(record.vehicle.is_none());
        assert_eq!(record.confidence_of(Field::PlateNumber), None);
    }

    #[test]
    fn test_overall_confidence_penalizes_missing_critical_fields() {
        let mut record = PolicyRecord::new();
        assert_eq!(overall_confidence(&record), 0.0);

        for field in CRITICAL_FIELDS {
            record.set_confidence(*field, 0.9);
        }
        assert_eq!(overall_confidence(&record), 0.9);

        record.set_confidence(Field::InsuredName, 0.6);
        // 0.7 * 0.9 + 0.3 * 0.6
        assert_eq!(overall_confidence(&record), 0.81);

        record.metadata.field_confidence.remove(&Field::Issuer);
        // 0.81 * (1 - 0.5 * 1/5)
        assert_eq!(overall_confidence(&record), 0.73);

        record.category = PolicyCategory::Traffic;
        // The missing plate joins the critical set
        assert!(overall_confidence(&record) < 0.73);
    }

    #[test]
    fn test_isolate_turns_panic_into_warning() {
        let mut warnings = Vec::new();
        let result: Option<()> = isolate(Field::Tax, &mut warnings, || panic!("boom"));

        assert!(result.is_none());
        assert_eq!(warnings, vec!["internal failure while extracting tax: boom".to_string()]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = orchestrator().extract(TRAFFIC_POLICY);
        let second = orchestrator().extract(TRAFFIC_POLICY);
        assert_eq!(first.record, second.record);
        assert_eq!(first.warnings, second.warnings);
    }
}
