//! Phone and address of the insured party.

use super::patterns::{ADDRESS_LABELED, PHONE_LABELED};
use super::ExtractionMatch;

/// Longest address kept, in characters.
const MAX_ADDRESS_CHARS: usize = 200;

/// Contact details found in a policy.
#[derive(Debug, Clone, Default)]
pub struct ContactDetails {
    pub phone: Option<ExtractionMatch<String>>,
    pub address: Option<ExtractionMatch<String>>,
}

/// Phone number next to a Tel/Telefon/GSM/Cep label, as digits with a leading 0.
pub fn extract_phone(text: &str) -> Option<ExtractionMatch<String>> {
    PHONE_LABELED.captures_iter(text).find_map(|caps| {
        let m = caps.get(1)?;
        let digits: String = m.as_str().chars().filter(char::is_ascii_digit).collect();
        let phone = match digits.len() {
            10 => format!("0{}", digits),
            11 if digits.starts_with('0') => digits,
            _ => return None,
        };
        Some(
            ExtractionMatch::new(phone, 0.8, m.as_str())
                .with_position(m.start(), m.end())
                .with_rule("phone_labeled"),
        )
    })
}

/// Remainder of the line labelled "Adres" or "Adresi".
pub fn extract_address(text: &str) -> Option<ExtractionMatch<String>> {
    let caps = ADDRESS_LABELED.captures(text)?;
    let m = caps.get(1)?;

    let address: String = m
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_ADDRESS_CHARS)
        .collect();
    if address.chars().count() < 5 {
        return None;
    }

    Some(
        ExtractionMatch::new(address, 0.75, m.as_str())
            .with_position(m.start(), m.end())
            .with_rule("address_labeled"),
    )
}

/// Extract phone and address.
pub fn extract_contact(text: &str) -> ContactDetails {
    ContactDetails {
        phone: extract_phone(text),
        address: extract_address(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_phone_formats() {
        assert_eq!(extract_phone("Cep Tel: 0532 123 45 67").unwrap().value, "05321234567");
        assert_eq!(extract_phone("GSM 532-123-45-67").unwrap().value, "05321234567");
        assert_eq!(extract_phone("Telefon : 02121234567").unwrap().confidence, 0.8);
        assert!(extract_phone("Tel: 12345").is_none());
        assert!(extract_phone("0532 123 45 67").is_none());
    }

    #[test]
    fn test_address() {
        let found = extract_address("Adresi : Bağdat Cad.  No:5   Kadıköy/İSTANBUL\nTel: 0216").unwrap();
        assert_eq!(found.value, "Bağdat Cad. No:5 Kadıköy/İSTANBUL");
        assert_eq!(found.confidence, 0.75);

        assert!(extract_address("Adres: -").is_none());
    }

    #[test]
    fn test_extract_contact() {
        let details = extract_contact("Adres: Atatürk Mah. 12\nTel: 0312 555 44 33");
        assert_eq!(details.phone.unwrap().value, "03125554433");
        assert_eq!(details.address.unwrap().value, "Atatürk Mah. 12");
    }
}
