//! Vehicle details for motor policies.

use chrono::{Datelike, Local};

use super::patterns::{CHASSIS_NUMBER, ENGINE_NUMBER, USAGE_TYPE, VEHICLE_MAKE_MODEL, VEHICLE_YEAR};
use super::ExtractionMatch;

/// Oldest model year accepted.
const MIN_MODEL_YEAR: i32 = 1950;

/// Vehicle fields found in a policy.
#[derive(Debug, Clone, Default)]
pub struct VehicleDetails {
    pub make: Option<ExtractionMatch<String>>,
    pub model: Option<ExtractionMatch<String>>,
    pub usage_type: Option<ExtractionMatch<String>>,
    pub year: Option<ExtractionMatch<i32>>,
    pub chassis_number: Option<ExtractionMatch<String>>,
    pub engine_number: Option<ExtractionMatch<String>>,
}

/// Vehicle detail extractor.
pub struct VehicleExtractor {
    current_year: i32,
}

impl VehicleExtractor {
    pub fn new() -> Self {
        Self {
            current_year: Local::now().year(),
        }
    }

    /// Fix the year used to bound model years.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Extract every vehicle field.
    pub fn extract_details(&self, text: &str) -> VehicleDetails {
        let (make, model) = self.make_and_model(text);

        VehicleDetails {
            make,
            model,
            usage_type: self.usage_type(text),
            year: self.model_year(text),
            chassis_number: upper_capture(text, &CHASSIS_NUMBER, 0.90, "chassis_number"),
            engine_number: upper_capture(text, &ENGINE_NUMBER, 0.85, "engine_number"),
        }
    }

    fn make_and_model(
        &self,
        text: &str,
    ) -> (Option<ExtractionMatch<String>>, Option<ExtractionMatch<String>>) {
        let Some(caps) = VEHICLE_MAKE_MODEL.captures(text) else {
            return (None, None);
        };

        let field = |group: usize, rule: &'static str| {
            caps.get(group).and_then(|m| {
                let value = m.as_str().trim();
                (!value.is_empty()).then(|| {
                    ExtractionMatch::new(value.to_string(), 0.8, m.as_str())
                        .with_position(m.start(), m.end())
                        .with_rule(rule)
                })
            })
        };

        (field(1, "vehicle_make"), field(2, "vehicle_model"))
    }

    fn model_year(&self, text: &str) -> Option<ExtractionMatch<i32>> {
        VEHICLE_YEAR.captures_iter(text).find_map(|caps| {
            let m = caps.get(1)?;
            let year: i32 = m.as_str().parse().ok()?;
            (MIN_MODEL_YEAR..=self.current_year + 1).contains(&year).then(|| {
                ExtractionMatch::new(year, 0.85, m.as_str())
                    .with_position(m.start(), m.end())
                    .with_rule("vehicle_year")
            })
        })
    }

    fn usage_type(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let caps = USAGE_TYPE.captures(text)?;
        let m = caps.get(1)?;
        let value = m.as_str().trim();
        (2..=40).contains(&value.chars().count()).then(|| {
            ExtractionMatch::new(value.to_string(), 0.75, m.as_str())
                .with_position(m.start(), m.end())
                .with_rule("usage_type")
        })
    }
}

impl Default for VehicleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn upper_capture(
    text: &str,
    pattern: &regex::Regex,
    confidence: f32,
    rule: &'static str,
) -> Option<ExtractionMatch<String>> {
    let caps = pattern.captures(text)?;
    let m = caps.get(1)?;
    Some(
        ExtractionMatch::new(m.as_str().to_uppercase(), confidence, m.as_str())
            .with_position(m.start(), m.end())
            .with_rule(rule),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REGISTRATION: &str = "Marka : RENAULT\nTipi : CLIO 1.5 DCI\nModel Yılı : 2019\n\
        Şasi No : VF1RJA00123456789\nMotor No : K9KA123456\nKullanım Tarzı : HUSUSİ OTO\n";

    #[test]
    fn test_extract_details() {
        let details = VehicleExtractor::new()
            .with_current_year(2025)
            .extract_details(REGISTRATION);

        assert_eq!(details.make.unwrap().value, "RENAULT");
        assert_eq!(details.model.unwrap().value, "CLIO 1.5 DCI");
        assert_eq!(details.year.unwrap().value, 2019);
        assert_eq!(details.chassis_number.unwrap().value, "VF1RJA00123456789");
        assert_eq!(details.engine_number.unwrap().value, "K9KA123456");
        assert_eq!(details.usage_type.unwrap().value, "HUSUSİ OTO");
    }

    #[test]
    fn test_model_year_bounds() {
        let extractor = VehicleExtractor::new().with_current_year(2025);
        assert!(extractor.model_year("Model Yılı : 1949").is_none());
        assert!(extractor.model_year("Model Yılı : 2027").is_none());
        assert_eq!(extractor.model_year("Model Yılı : 2026").unwrap().value, 2026);
    }

    #[test]
    fn test_short_chassis_is_ignored() {
        let details = VehicleExtractor::new().extract_details("Şasi No: ABC123");
        assert!(details.chassis_number.is_none());
        assert!(details.make.is_none());
    }
}
