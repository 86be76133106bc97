//! Insurance policy data models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Insurance company that issued a policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Issuer {
    #[default]
    Unknown,
    Acibadem,
    AcnTurk,
    Ak,
    Allianz,
    Ana,
    Anadolu,
    Ankara,
    Arex,
    Atlas,
    Axa,
    Bereket,
    Corpus,
    Doga,
    Emaa,
    Ethica,
    Eureko,
    Gulf,
    Hdi,
    Hepiyi,
    Koru,
    Magdeburger,
    Mapfre,
    Neova,
    Orient,
    Prive,
    Quick,
    Ray,
    Referans,
    Seker,
    Sompo,
    TurkiyeKatilim,
    TurkiyePusula,
    TurkNippon,
    Unico,
    Zurich,
}

impl Issuer {
    /// Human readable company name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Issuer::Unknown => "Unknown",
            Issuer::Acibadem => "Acıbadem Sigorta",
            Issuer::AcnTurk => "ACN Türk Sigorta",
            Issuer::Ak => "Aksigorta",
            Issuer::Allianz => "Allianz Sigorta",
            Issuer::Ana => "Ana Sigorta",
            Issuer::Anadolu => "Anadolu Sigorta",
            Issuer::Ankara => "Ankara Sigorta",
            Issuer::Arex => "Arex Sigorta",
            Issuer::Atlas => "Atlas Sigorta",
            Issuer::Axa => "AXA Sigorta",
            Issuer::Bereket => "Bereket Sigorta",
            Issuer::Corpus => "Corpus Sigorta",
            Issuer::Doga => "Doğa Sigorta",
            Issuer::Emaa => "Emaa Sigorta",
            Issuer::Ethica => "Ethica Sigorta",
            Issuer::Eureko => "Eureko Sigorta",
            Issuer::Gulf => "Gulf Sigorta",
            Issuer::Hdi => "HDI Sigorta",
            Issuer::Hepiyi => "Hepiyi Sigorta",
            Issuer::Koru => "Koru Sigorta",
            Issuer::Magdeburger => "Magdeburger Sigorta",
            Issuer::Mapfre => "MAPFRE Sigorta",
            Issuer::Neova => "Neova Katılım Sigorta",
            Issuer::Orient => "Orient Sigorta",
            Issuer::Prive => "Prive Sigorta",
            Issuer::Quick => "Quick Sigorta",
            Issuer::Ray => "Ray Sigorta",
            Issuer::Referans => "Referans Sigorta",
            Issuer::Seker => "Şeker Sigorta",
            Issuer::Sompo => "Sompo Sigorta",
            Issuer::TurkiyeKatilim => "Türkiye Katılım Sigorta",
            Issuer::TurkiyePusula => "Türkiye Sigorta",
            Issuer::TurkNippon => "Türk Nippon Sigorta",
            Issuer::Unico => "Unico Sigorta",
            Issuer::Zurich => "Zurich Sigorta",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Issuer::Unknown
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Line of business of a policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyCategory {
    #[default]
    Unknown,
    /// Compulsory motor third-party liability (trafik).
    Traffic,
    /// Motor own-damage (kasko).
    MotorOwnDamage,
    /// Compulsory earthquake (DASK).
    Earthquake,
    /// Home (konut).
    Home,
    /// Personal accident (ferdi kaza).
    PersonalAccident,
    Travel,
    Health,
    /// Voluntary motor liability (İMM).
    MotorLiability,
    /// Green card (yeşil kart).
    GreenCard,
    /// Passenger seat (koltuk).
    PassengerSeat,
    Fire,
    NaturalDisaster,
    /// Workplace contents (işyeri muhteviyat).
    WorkplaceContents,
    /// Supplementary health (TSS).
    SupplementaryHealth,
    Workplace,
    /// Health cover for foreign residents.
    ForeignHealth,
    /// Cargo/transport (nakliyat).
    Cargo,
    Engineering,
    Liability,
    Agriculture,
    Life,
}

impl PolicyCategory {
    /// Categories that describe a vehicle and get vehicle fields extracted.
    pub fn is_vehicle_related(&self) -> bool {
        matches!(
            self,
            PolicyCategory::Traffic | PolicyCategory::MotorOwnDamage | PolicyCategory::PersonalAccident
        )
    }

    /// Categories where the plate is mandatory.
    pub fn requires_plate(&self) -> bool {
        matches!(self, PolicyCategory::Traffic | PolicyCategory::MotorOwnDamage)
    }

    pub fn is_known(&self) -> bool {
        *self != PolicyCategory::Unknown
    }

    /// Turkish trade name of the category.
    pub fn display_name(&self) -> &'static str {
        match self {
            PolicyCategory::Unknown => "Bilinmiyor",
            PolicyCategory::Traffic => "Trafik",
            PolicyCategory::MotorOwnDamage => "Kasko",
            PolicyCategory::Earthquake => "DASK",
            PolicyCategory::Home => "Konut",
            PolicyCategory::PersonalAccident => "Ferdi Kaza",
            PolicyCategory::Travel => "Seyahat",
            PolicyCategory::Health => "Sağlık",
            PolicyCategory::MotorLiability => "İMM",
            PolicyCategory::GreenCard => "Yeşil Kart",
            PolicyCategory::PassengerSeat => "Koltuk",
            PolicyCategory::Fire => "Yangın",
            PolicyCategory::NaturalDisaster => "Doğal Koruma",
            PolicyCategory::WorkplaceContents => "İşyeri Muhteviyat",
            PolicyCategory::SupplementaryHealth => "TSS",
            PolicyCategory::Workplace => "İşyeri",
            PolicyCategory::ForeignHealth => "Yabancı Sağlık",
            PolicyCategory::Cargo => "Nakliyat",
            PolicyCategory::Engineering => "Mühendislik",
            PolicyCategory::Liability => "Sorumluluk",
            PolicyCategory::Agriculture => "Tarım",
            PolicyCategory::Life => "Hayat",
        }
    }
}

impl fmt::Display for PolicyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Names of the fields tracked in the confidence map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Issuer,
    Category,
    PolicyNumber,
    StartDate,
    EndDate,
    IssueDate,
    NetPremium,
    GrossPremium,
    Tax,
    InsuredName,
    NationalId,
    Phone,
    Address,
    PlateNumber,
    VehicleMake,
    VehicleModel,
    VehicleType,
    VehicleYear,
    ChassisNumber,
    EngineNumber,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Issuer => "issuer",
            Field::Category => "category",
            Field::PolicyNumber => "policy_number",
            Field::StartDate => "start_date",
            Field::EndDate => "end_date",
            Field::IssueDate => "issue_date",
            Field::NetPremium => "net_premium",
            Field::GrossPremium => "gross_premium",
            Field::Tax => "tax",
            Field::InsuredName => "insured_name",
            Field::NationalId => "national_id",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::PlateNumber => "plate_number",
            Field::VehicleMake => "vehicle_make",
            Field::VehicleModel => "vehicle_model",
            Field::VehicleType => "vehicle_type",
            Field::VehicleYear => "vehicle_year",
            Field::ChassisNumber => "chassis_number",
            Field::EngineNumber => "engine_number",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured insurance policy extracted from document text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    /// Issuing insurance company.
    pub issuer: Issuer,

    /// Display name of the issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer_name: Option<String>,

    /// Policy line of business.
    pub category: PolicyCategory,

    /// Policy (or certificate) number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,

    /// Cover period and issue date.
    pub period: PolicyPeriod,

    /// Premium amounts, always non-negative.
    pub premium: Premium,

    /// Insured party.
    pub insured: Insured,

    /// Vehicle details, only for vehicle-related categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,

    /// Extraction metadata.
    pub metadata: ExtractionMetadata,
}

/// Cover period of a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyPeriod {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Date the policy was issued (tanzim tarihi).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Days between start and end date. Derived during validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<i64>,
}

impl PolicyPeriod {
    /// Days from start to end when both are known.
    pub fn span_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

/// Premium amounts in TL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premium {
    /// Net premium (before tax).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net: Option<Decimal>,

    /// Gross premium (amount payable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross: Option<Decimal>,

    /// Insurance transaction tax (gider vergisi).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<Decimal>,
}

/// The insured party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insured {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Turkish national identity number (TC kimlik no), checksum verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub national_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Insured vehicle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Plate in `34 ABC 123` form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Usage type (kullanım tarzı).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chassis_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_number: Option<String>,
}

impl Vehicle {
    pub fn is_empty(&self) -> bool {
        *self == Vehicle::default()
    }
}

/// Metadata about the extraction process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Overall extraction confidence (0.0 - 1.0).
    pub confidence: f32,

    /// Field-level confidence scores.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_confidence: BTreeMap<Field, f32>,

    /// How the values were obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,

    /// Cancellation, endorsement or termination notice.
    #[serde(skip)]
    pub is_cancellation: bool,

    /// Money fields whose source value carried a minus sign.
    #[serde(skip)]
    pub reversed_amounts: Vec<Field>,
}

impl PolicyRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the confidence of an extracted field.
    pub fn set_confidence(&mut self, field: Field, confidence: f32) {
        self.metadata
            .field_confidence
            .insert(field, confidence.clamp(0.0, 1.0));
    }

    pub fn confidence_of(&self, field: Field) -> Option<f32> {
        self.metadata.field_confidence.get(&field).copied()
    }

    /// Plate number, if a vehicle section exists.
    pub fn plate(&self) -> Option<&str> {
        self.vehicle.as_ref().and_then(|v| v.plate.as_deref())
    }

    /// Whether the source showed this money field as negative.
    pub fn is_reversed(&self, field: Field) -> bool {
        self.metadata.reversed_amounts.contains(&field)
    }
}
