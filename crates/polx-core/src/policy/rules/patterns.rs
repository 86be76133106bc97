//! Regex patterns and keyword tables for Turkish insurance policies.
//!
//! Turkish documents mix dotted and dotless `i` freely (and OCR makes it
//! worse), so labels spell every `i` as `[İIı]` or `[ıi]`. With `(?i)` those
//! classes cover `İ`, `I`, `i` and `ı`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::policy::{Issuer, PolicyCategory};

lazy_static! {
    // Generic tokens
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})\b"
    ).unwrap();

    pub static ref MONEY_TOKEN: Regex = Regex::new(
        r"\b([0-9]{1,3}(?:[.,][0-9]{3})*(?:[.,][0-9]{2})?)\b"
    ).unwrap();

    pub static ref NATIONAL_ID_CANDIDATE: Regex = Regex::new(
        r"\b([0-9]{11})\b"
    ).unwrap();

    pub static ref PLATE_TOKEN: Regex = Regex::new(
        r"(?i)\b(0?[0-9]{2}\s*[A-Z]{1,3}\s*[0-9]{2,4})\b"
    ).unwrap();

    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"-?[0-9.,]*[0-9][0-9.,]*"
    ).unwrap();

    // Dates: "Başlangıç-Bitiş Tarihi 19/10/2025-19/10/2026" (HDI)
    pub static ref DATE_RANGE_COMBINED: Regex = Regex::new(
        r"(?i)BA[ŞS]LANG[İIı][ÇC][\s\-]+B[İIı]T[İIı][ŞS]\s+TAR[İIı]H[İIı]\s+([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})[\s\-]+([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    pub static ref START_DATE_LABELED: Regex = Regex::new(
        r"(?i)(?:Ba[şs]lang[İIı][çc]|Start|Ba[şs]lama)[\s:]+Tar[İIı]h[İIı]?[\s:]*([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    pub static ref START_DATE_TABLE: Regex = Regex::new(
        r"(?i)BA[ŞS]LANG[İIı][ÇC]\s+TAR[İIı]H[İIı][:\s]+([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    pub static ref END_DATE_LABELED: Regex = Regex::new(
        r"(?i)(?:B[İIı]t[İIı]?[şs]|End|Sona)[\s:]+Tar[İIı]h[İIı]?[\s:]*([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    pub static ref END_DATE_TABLE: Regex = Regex::new(
        r"(?i)B[İIı]T[İIı][ŞS]\s+TAR[İIı]H[İIı][:\s]+([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    pub static ref ISSUE_DATE_LABELED: Regex = Regex::new(
        r"(?i)(?:Tanz[İIı]m|[İIı]hda[çc]|D[üu]zenle[nm]|Issue)[\s:]+Tar[İIı]h[İIı]?[\s:]*([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    pub static ref ISSUE_DATE_TABLE: Regex = Regex::new(
        r"(?i)Tanz[İIı]m\s+Tar[İIı]h[İIı]\s*[:\s]+([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    // "29/08/2025 TARİHİNDE ... TANZİM EDİLMİŞTİR" (Allianz)
    pub static ref ISSUE_DATE_TRAILING: Regex = Regex::new(
        r"(?i)([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4}).*TAR[İIı]H[İIı]NDE.*TANZ[İIı]M"
    ).unwrap();

    // "Düzenleme Tarihi" header with the value further down (Anadolu)
    pub static ref ISSUE_DATE_BELOW: Regex = Regex::new(
        r"(?i)D[üu]zenle[nm]e\s+Tar[İIı]h[İIı][\s\S]{0,100}?([0-9]{1,2}[./\-][0-9]{1,2}[./\-][0-9]{4})"
    ).unwrap();

    // Net premium
    pub static ref NET_CONTRIBUTION: Regex = Regex::new(
        r"(?i)(?:TOPLAM\s+)?NET\s+KATKI\s+PR[İIı]M[İIı]\s*:?\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref NET_PREMIUM_EVERY: Regex = Regex::new(
        r"(?i)Net\s+Pr[İIı]m\s+(-?[0-9.,]+)"
    ).unwrap();

    pub static ref PRE_TAX_PREMIUM_TABLE: Regex = Regex::new(
        r"(?i)Verg[İIı]\s+[ÖO]nces[İIı]\s+Pr[İIı]m[\s\S]{0,100}?(-?[0-9]{1,3}(?:[.,][0-9]{3})*,[0-9]{2})\s*(?:TL|USD|EUR)?"
    ).unwrap();

    pub static ref PRE_TAX_PREMIUM: Regex = Regex::new(
        r"(?i)Verg[İIı]\s+[ÖO]nces[İIı]\s+Pr[İIı]m\s*:?\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref NET_PREMIUM: Regex = Regex::new(
        r"(?i)(?:Net\s+Pr[İIı]m|Net\s+Prem[İIı]um)[\s:]*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref NET_SHORT: Regex = Regex::new(
        r"(?i)Net\s*:\s*(-?[0-9.,]+)"
    ).unwrap();

    // Gross premium
    // ": 100.00 TL\nBitiş Tarihi Prim Tutarı" (Quick life certificates)
    pub static ref PREMIUM_BEFORE_HEADER: Regex = Regex::new(
        r"(?i):\s*(-?[0-9.,]+)\s*TL\s+B[İIı]t[İIı][şs]\s+Tar[İIı]h[İIı]\s+Pr[İIı]m\s+Tutar[ıi]"
    ).unwrap();

    // ": 100.00 TL\n:15.09.2026\nBitiş Tarihi Prim Tutarı"
    pub static ref PREMIUM_BEFORE_DATED_HEADER: Regex = Regex::new(
        r"(?i):\s*(-?[0-9.,]+)\s*TL\s+:[0-9.]+\s+B[İIı]t[İIı][şs]\s+Tar[İIı]h[İIı]\s+Pr[İIı]m\s+Tutar[ıi]"
    ).unwrap();

    pub static ref PREMIUM_AMOUNT: Regex = Regex::new(
        r"(?i)Pr[İIı]m\s+Tutar[ıi]\s*:?\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref TOTAL_PREMIUM: Regex = Regex::new(
        r"(?i)Toplam\s+Pr[İIı]m\s*:?\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref GROSS_CONTRIBUTION: Regex = Regex::new(
        r"(?i)BR[ÜU]T\s+KATKI\s+PR[İIı]M[İIı]\s*:?\s*(-?[0-9.,]+)"
    ).unwrap();

    // "Peşin 0,00 11.830,00 11.830,00": the last column is the amount payable
    pub static ref INSTALLMENT_ROW: Regex = Regex::new(
        r"(?i)Pe[şs][İIı]n\s+(-?[0-9]{1,3}(?:[.,][0-9]{3})*,[0-9]{2})\s+(-?[0-9]{1,3}(?:[.,][0-9]{3})*,[0-9]{2})\s+(-?[0-9]{1,3}(?:[.,][0-9]{3})*,[0-9]{2})"
    ).unwrap();

    pub static ref POLICY_PREMIUM: Regex = Regex::new(
        r"(?i)Pol[İIı][çc]e\s+Pr[İIı]m[İIı]\s*:\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref PAYABLE_PREMIUM_EVERY: Regex = Regex::new(
        r"Ödenecek Prim\s+(-?[0-9.,]+)"
    ).unwrap();

    pub static ref PAYABLE_PREMIUM: Regex = Regex::new(
        r"(?i)[ÖO]denecek\s+Pr[İIı]m\s+(-?[0-9]{1,3}(?:\.[0-9]{3})*,[0-9]{2})(?:\s|$)"
    ).unwrap();

    pub static ref PAYABLE_AMOUNT: Regex = Regex::new(
        r"(?i)[ÖO]denecek\s+Tutar\s*:?\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref GROSS_PREMIUM: Regex = Regex::new(
        r"(?i)(?:Br[üu]t\s+Pr[İIı]m|Br[üu]t\s+Prem[İIı]um)[\s:]*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref PAYABLE_SHORT: Regex = Regex::new(
        r"(?i)[ÖO]denecek\s*:\s*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref PAYABLE_PREMIUM_REGION: Regex = Regex::new(
        r"(?i)[ÖO]denecek\s+Pr[İIı]m[\s\S]{1,150}"
    ).unwrap();

    pub static ref AMOUNT_IN_TL: Regex = Regex::new(
        r"([0-9.,]+)\s*TL"
    ).unwrap();

    // Tax
    pub static ref EXPENSE_TAX: Regex = Regex::new(
        r"(?i)G[İIı]der\s+Verg[İIı]s[İIı][\s:]*(-?[0-9.,]+)"
    ).unwrap();

    pub static ref BSMV_TAX: Regex = Regex::new(
        r"(?i)BSM(?:V|\s+Verg[İIı]s[İIı])[\s:*]*(-?[0-9.,]+)"
    ).unwrap();

    // Policy number
    pub static ref CERTIFICATE_NUMBER: Regex = Regex::new(
        r"(?i)Sert[İIı]f[İIı]ka\s+Numaras[ıi]\s*:?\s*([0-9]{6,15})"
    ).unwrap();

    // "Poliçenin Suretidir. 182832580-2460951-091326" (Unico personal accident)
    pub static ref CERTIFIED_COPY_NUMBER: Regex = Regex::new(
        r"(?i)Pol[İIı][çc]en[İIı]n\s+Suret[İIı]d[İIı]r\.\s+([0-9][0-9\-]*)"
    ).unwrap();

    // "KARAYOLLARI ... 138573715 / 0" (Unico traffic)
    pub static ref TRAFFIC_NUMBER_WITH_SUFFIX: Regex = Regex::new(
        r"(?is)KARAYOLLARI.*?([0-9]{8,12})\s*/\s*[0-9]"
    ).unwrap();

    pub static ref RENEWAL_ENDORSEMENT_NUMBER: Regex = Regex::new(
        r"(?i)Pol[İIı][çc]e\s*/\s*Yen[İIı]leme\s*/\s*Zey[İIı]l\s*/\s*[ÜU]r[üu]n\s*No\s*:\s*([0-9]{6,15})"
    ).unwrap();

    pub static ref RENEWAL_NUMBER: Regex = Regex::new(
        r"(?i)POL[İIı][ÇC]E\s*/\s*YEN[İIı]LEME\s+NO\s*:?\s*([0-9]{6,15})"
    ).unwrap();

    pub static ref POLICY_NUMBER: Regex = Regex::new(
        r"(?i)(?:Pol[İIı][çc]e\s+No|Pol[İIı]cy\s+No|Pol[İIı][çc]e\s+Numara)[\s:./]*([0-9]{6,20})"
    ).unwrap();

    pub static ref PREFIXED_NUMBER: Regex = Regex::new(
        r"[A-Z]?-?[0-9]{6,20}(?:-[0-9]+)*"
    ).unwrap();

    pub static ref DIGIT_RUN: Regex = Regex::new(
        r"[0-9]{6,20}"
    ).unwrap();

    // "T-382492524-0-0  AB12  01/01/2025" in a listing table
    pub static ref TABULAR_POLICY_NUMBER: Regex = Regex::new(
        r"([A-Z]?-?[0-9]{6,20}(?:-[0-9]+)*)\s+[A-Z0-9]{2,10}\s+[0-9]{2}/[0-9]{2}/[0-9]{4}"
    ).unwrap();

    // Plate: "Plaka       :016MA0437" (Doğa)
    pub static ref PLATE_LABELED: Regex = Regex::new(
        r"(?i)Plaka\s*:\s*(0?[0-9]{2}[A-Z]{1,3}[0-9]{2,4})\b"
    ).unwrap();

    // Insured name
    pub static ref NAME_NEXT_LINE: Regex = Regex::new(
        r"(?i)S[İIı]gortal[ıi]\s*\n\s*([A-ZÇĞİÖŞÜ][A-ZÇĞİÖŞÜa-zçğıöşü\s]+?)\s*\n"
    ).unwrap();

    // "Adı Soyadı / Ünvanı : ..." tolerating OCR'd "Adõ Soyadõ"
    pub static ref NAME_WITH_TITLE: Regex = Regex::new(
        r"(?i)Ad[ıõi]\s+Soyad[ıõi]\s*/\s*[ÜU]nvan[ıõi]\s*[:\s]+([A-ZÇĞİÖŞÜ][a-zçğıöşüA-ZÇĞİÖŞÜ\s]+?)(?:\s*\n|\s+MAH\b|\s+CAD\b|\s+SOK\b|TC\s|[İI]let[İIı][şs][İIı]m)"
    ).unwrap();

    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?:Ad[ıi]\s+Soyad[ıi]|[İI]sim|Sigortal[ıi])[\s:]+([A-ZÇĞİÖŞÜ][a-zçğıöşü]+(?:\s+[A-ZÇĞİÖŞÜ][a-zçğıöşü]+)+)"
    ).unwrap();

    pub static ref NAME_AFTER_LABEL: Regex = Regex::new(
        r"[:\s]+([A-ZÇĞİÖŞÜ][a-zçğıöşüA-ZÇĞİÖŞÜ]+(?:\s+[A-ZÇĞİÖŞÜ][a-zçğıöşüA-ZÇĞİÖŞÜ]+)+)"
    ).unwrap();

    // Contact details
    pub static ref PHONE_LABELED: Regex = Regex::new(
        r"(?i)(?:Tel(?:efon)?|GSM|Cep)[^\n0-9]{0,20}(0?[0-9]{3}[\s\-]?[0-9]{3}[\s\-]?[0-9]{2}[\s\-]?[0-9]{2})\b"
    ).unwrap();

    pub static ref ADDRESS_LABELED: Regex = Regex::new(
        r"(?i)Adres[İIı]?\s*:\s*([^\n]{5,})"
    ).unwrap();

    // Vehicle
    pub static ref VEHICLE_MAKE_MODEL: Regex = Regex::new(
        r"(?i)(?:Marka|Brand)[\s:]+([A-ZÇĞİÖŞÜa-zçğıöşü\-/]+)[\s\S]{0,100}?(?:T[İIı]p[İIı]?|Model|Type)[\s:]+([A-Z0-9][A-Za-z0-9 \t.\-/]+)"
    ).unwrap();

    pub static ref VEHICLE_YEAR: Regex = Regex::new(
        r"(?i)(?:Model\s+Y[ıi]l[ıi]|Model|Y[ıi]l)[\s:]*([0-9]{4})\b"
    ).unwrap();

    pub static ref CHASSIS_NUMBER: Regex = Regex::new(
        r"(?i)(?:[ŞS]as[İIı]|Chass[İIı]s|[ŞS]ase)[\s:]+No[\s:]*([A-Z0-9]{17})\b"
    ).unwrap();

    pub static ref ENGINE_NUMBER: Regex = Regex::new(
        r"(?i)(?:Motor|Eng[İIı]ne)[\s:]+No[\s:]*([A-Z0-9]{5,})"
    ).unwrap();

    pub static ref USAGE_TYPE: Regex = Regex::new(
        r"(?i)Kullan[ıi]m\s+Tarz[ıi][\s:]+([^\n]+)"
    ).unwrap();
}

/// Surface forms per issuer, including spelling and diacritic variants.
pub static ISSUER_KEYWORDS: &[(Issuer, &[&str])] = &[
    (Issuer::Acibadem, &["ACİBADEM", "ACIBADEM", "ACİBADEM SİGORTA"]),
    (Issuer::AcnTurk, &["ACN TÜRK", "ACN TURK", "ACNTURK"]),
    (
        Issuer::Ak,
        &["AKSİGORTA", "AKSIGORTA", "AK SİGORTA", "AK ANONİM", "Aksigorta A.Ş", "Aksigorta Anonim"],
    ),
    (Issuer::Allianz, &["ALLIANZ", "ALLİANZ", "ALLIANZ SİGORTA"]),
    (Issuer::Ana, &["ANA SİGORTA", "ANA SIGORTA", "ANADOLU ANONİM"]),
    (
        Issuer::Anadolu,
        &[
            "ANADOLU ANONIM TÜRK SIGORTA ŞIRKETI",
            "ANADOLU ANONIM TURK SIGORTA SIRKETI",
            "ANADOLU ANONİM TÜRK SİGORTA ŞİRKETİ",
            "ANADOLU ANONİM TÜRK SİGORTA",
            "ANADOLU SİGORTA",
            "ANADOLU SIGORTA",
            "ANADOLU ANONİM",
        ],
    ),
    (Issuer::Ankara, &["ANKARA SİGORTA", "ANKARA SIGORTA", "ANKARA ANONİM"]),
    (Issuer::Arex, &["AREX", "AREX SİGORTA", "AREX SIGORTA"]),
    (Issuer::Atlas, &["ATLAS", "ATLAS SİGORTA", "ATLAS SIGORTA"]),
    (Issuer::Axa, &["AXA", "AXA SİGORTA", "AXA SIGORTA"]),
    (Issuer::Bereket, &["BEREKET", "BEREKET SİGORTA", "BEREKET SIGORTA"]),
    (Issuer::Corpus, &["CORPUS", "CORPUS SİGORTA", "CORPUS SIGORTA"]),
    (Issuer::Doga, &["DOĞA SİGORTA", "DOGA SIGORTA", "DOĞA", "DOGA"]),
    (Issuer::Emaa, &["EMAA", "EMAA SİGORTA", "EMAA SIGORTA"]),
    (Issuer::Ethica, &["ETHICA", "ETHICA SİGORTA", "ETHİCA"]),
    (Issuer::Eureko, &["EUREKO", "EUREKO SİGORTA", "EUREKO SIGORTA"]),
    (Issuer::Gulf, &["GULF", "GULF SİGORTA", "GULF SIGORTA"]),
    (Issuer::Hdi, &["HDI", "HDI SİGORTA", "HDI SIGORTA"]),
    (Issuer::Hepiyi, &["HEPİYİ", "HEPIYI", "HEPİYİ SİGORTA"]),
    (Issuer::Koru, &["KORU", "KORU SİGORTA", "KORU SIGORTA"]),
    (Issuer::Magdeburger, &["MAGDEBURGER", "MAGDEBURGER SİGORTA"]),
    (Issuer::Mapfre, &["MAPFRE", "MAPFRE SİGORTA", "MAPFRE GENEL SİGORTA"]),
    (
        Issuer::Neova,
        &["NEOVA KATILIM SİGORTA", "NEOVA SİGORTA", "NEOVA SIGORTA", "NEOVA", "KATILIM SİGORTA POLİÇESİ"],
    ),
    (Issuer::Orient, &["ORIENT", "ORIENT SİGORTA", "ORIENT SIGORTA"]),
    (Issuer::Prive, &["PRIVE", "PRİVE", "PRIVE SİGORTA"]),
    (Issuer::Quick, &["QUICK", "QUICK SİGORTA", "QUİCK"]),
    (Issuer::Ray, &["RAY SİGORTA", "RAY SIGORTA", "RAY ANONİM", "RAYSIGORTA"]),
    (Issuer::Referans, &["REFERANS SİGORTA", "REFERANS SIGORTA"]),
    (Issuer::Seker, &["ŞEKER", "SEKER", "ŞEKER SİGORTA"]),
    (Issuer::Sompo, &["SOMPO", "SOMPO SİGORTA", "SOMPO JAPAN"]),
    (Issuer::TurkiyeKatilim, &["TÜRKİYE KATILIM", "TURKIYE KATILIM", "KATILIM SİGORTA"]),
    (
        Issuer::TurkiyePusula,
        &[
            "TÜRKİYE PUSULA",
            "TURKIYE PUSULA",
            "PUSULA SİGORTA",
            "TÜRKİYE SİGORTA A.Ş",
            "TÜRKİYE SİGORTA AŞ",
            "TURKIYE SIGORTA A.S",
            "TURKIYE SIGORTA",
            "TÜRKİYE SİGORTA",
        ],
    ),
    (Issuer::TurkNippon, &["TÜRK NİPPON SİGORTA", "TURK NIPPON SIGORTA", "TURKNIPPON"]),
    (Issuer::Unico, &["UNICO SİGORTA A", "UNİCO SİGORTA A", "UNICO SIGORTA", "UNICO", "UNİCO"]),
    (Issuer::Zurich, &["ZURICH", "ZURİCH", "ZURICH SİGORTA"]),
];

/// Phrases that identify a policy category.
pub static CATEGORY_KEYWORDS: &[(PolicyCategory, &[&str])] = &[
    (
        PolicyCategory::Traffic,
        &[
            "KARAYOLLARI MOTORLU ARAÇLAR ZORUNLU MALİ SORUMLULUK",
            "TRAFİK SİGORTASI",
            "ZORUNLU TRAFİK",
            "KARAYOLLARI MOTORLU",
            "TRAFİK POLİÇESİ",
            "TRAFIK",
        ],
    ),
    (
        PolicyCategory::MotorOwnDamage,
        &["KASKO", "MOTORLİ ARAÇLAR KASKO", "TAM KASKO", "KASKO SİGORTASI"],
    ),
    (PolicyCategory::Earthquake, &["DASK", "ZORUNLU DEPREM", "DEPREM SİGORTASI"]),
    (PolicyCategory::Home, &["KONUT SİGORTASI", "EV SİGORTASI", "KONUT POLİÇESİ"]),
    (
        PolicyCategory::Life,
        &["YILLIK HAYAT SİGORTASI", "HAYAT SİGORTASI SERTİFİKASI", "HAYAT SİGORTASI", "HAYAT POLİÇESİ"],
    ),
    (PolicyCategory::Health, &["SAĞLIK SİGORTASI", "ÖZEL SAĞLIK"]),
    (
        PolicyCategory::SupplementaryHealth,
        &["TAMAMLAYICI SAĞLIK SİGORTASI", "TAMAMLAYICI SAĞLIK"],
    ),
    (PolicyCategory::Workplace, &["İŞYERİ SİGORTASI", "TİCARİ SİGORTA", "İŞYERİ POLİÇESİ"]),
    (
        PolicyCategory::PersonalAccident,
        &["FERDİ KAZA", "KİŞİSEL KAZA", "FERDİ KAZA SİGORTASI"],
    ),
    (PolicyCategory::Travel, &["SEYAHAT SİGORTASI", "YURT DIŞI SAĞLIK", "SEYAHAT POLİÇESİ"]),
    (PolicyCategory::ForeignHealth, &["YABANCI SAĞLIK", "YURT DIŞI SAĞLIK", "YAB. SAĞLIK"]),
    (PolicyCategory::Cargo, &["NAKLİYAT SİGORTASI", "EMTİA NAKLİYAT", "TAŞIMACILIK SİGORTASI"]),
    (PolicyCategory::Fire, &["YANGIN SİGORTASI", "YANGIN POLİÇESİ", "YANGIN VE HIRSIZLIK"]),
    (
        PolicyCategory::Engineering,
        &["MÜHENDİSLİK SİGORTASI", "İNŞAAT SİGORTASI", "MAKİNA KIRILMASI"],
    ),
    (
        PolicyCategory::Liability,
        &["SORUMLULUK SİGORTASI", "ÜÇÜNCÜ ŞAHIS SORUMLULUK", "MALİ SORUMLULUK"],
    ),
    (PolicyCategory::GreenCard, &["YEŞİL KART", "GREEN CARD"]),
    (PolicyCategory::PassengerSeat, &["KOLTUK FERDİ KAZA", "ZORUNLU KOLTUK"]),
    (
        PolicyCategory::MotorLiability,
        &["İHTİYARİ MALİ MESULİYET", "IHTIYARI MALI MESULIYET"],
    ),
    (PolicyCategory::NaturalDisaster, &["DOĞAL AFET", "DOĞAL KORUMA"]),
    (PolicyCategory::WorkplaceContents, &["İŞYERİ MUHTEVİYAT", "MUHTEVİYAT SİGORTASI"]),
    (PolicyCategory::Agriculture, &["TARIM SİGORTASI", "TARIMSAL ÜRÜN", "HAYVAN SİGORTASI"]),
];

/// Markers of cancellation, endorsement and termination notices.
pub static CANCELLATION_KEYWORDS: &[&str] = &[
    "İPTAL",
    "IPTAL",
    "ZEYİL",
    "ZEYIL",
    "FESİH",
    "FESIH",
    "PLAKA DEĞİŞİKLİĞİ",
    "PLAKA DEGISIKLIGI",
    "PLAKA ZEYLİ",
    "PLAKA ZEYLI",
    "ZEYİL PRİM BİLGİLERİ",
    "ZEYIL PRIM BILGILERI",
];

/// Administrative and address tokens that never belong in a person's name.
pub static NAME_DENYLIST: &[&str] = &[
    "TC", "VD", "VKN", "LTD", "ŞTİ", "A.Ş", "LİMİTED", "UAVT", "İLETİŞİM", "İLETISIM", "ADRESİ",
    "ADRESI", "MAH", "MAHALLE", "MAHALLESİ", "CAD", "CADDE", "CADDESİ", "SOK", "SOKAK", "SOKAĞI",
    "CEP", "TELEFON", "TELEFONU", "SABİT", "SABIT",
];

/// Upper-case a string and collapse dotted/dotless `I` into plain `I`.
pub fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    match c {
        'i' | 'ı' | 'İ' => 'I',
        _ => {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        }
    }
}

/// Case-insensitive search that also treats `İ`, `I`, `ı` and `i` as equal.
///
/// Returns the byte range of the first match in `haystack`.
pub fn find_keyword(haystack: &str, keyword: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = keyword.chars().map(fold_char).collect();
    if needle.is_empty() {
        return None;
    }

    'outer: for (start, _) in haystack.char_indices() {
        let mut end = start;
        let mut chars = haystack[start..].chars();
        for expected in &needle {
            match chars.next() {
                Some(c) if fold_char(c) == *expected => end += c.len_utf8(),
                _ => continue 'outer,
            }
        }
        return Some((start, end));
    }

    None
}

/// Slice of at most `max_chars` characters starting at byte offset `start`.
pub fn char_window(text: &str, start: usize, max_chars: usize) -> &str {
    let rest = &text[start..];
    let end = rest
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    &rest[..end]
}

/// First numeric token within `max_distance` characters after `keyword`.
///
/// Last-resort fallback: `"Net Prim: 12.345,67"` yields `"12.345,67"`.
pub fn extract_by_keyword<'a>(text: &'a str, keyword: &str, max_distance: usize) -> Option<&'a str> {
    let (_, keyword_end) = find_keyword(text, keyword)?;
    let window = char_window(text, keyword_end, max_distance);
    NUMERIC_TOKEN.find(window).map(|m| m.as_str())
}

/// Whether any surface form of `issuer` appears in the text.
pub fn mentions_issuer(text: &str, issuer: Issuer) -> bool {
    let folded = fold_case(text);
    ISSUER_KEYWORDS
        .iter()
        .filter(|(candidate, _)| *candidate == issuer)
        .flat_map(|(_, keywords)| keywords.iter())
        .any(|keyword| folded.contains(&fold_case(keyword)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_keyword_ignores_turkish_case() {
        assert_eq!(find_keyword("BRÜT PRİM: 100", "Brüt Prim"), Some((0, 11)));
        assert_eq!(find_keyword("x sigortalı y", "SİGORTALI"), Some((2, 12)));
        assert_eq!(find_keyword("nothing here", "Prim"), None);
    }

    #[test]
    fn test_extract_by_keyword() {
        assert_eq!(
            extract_by_keyword("Net Prim: 12.345,67 TL", "Net Prim", 50),
            Some("12.345,67")
        );
        assert_eq!(
            extract_by_keyword("Brüt Prim: -500,00", "brüt prim", 50),
            Some("-500,00")
        );
        assert_eq!(extract_by_keyword("Net Prim:      nothing", "Net Prim", 10), None);
    }

    #[test]
    fn test_extract_by_keyword_respects_window() {
        let text = format!("Net Prim{}123,45", " ".repeat(60));
        assert_eq!(extract_by_keyword(&text, "Net Prim", 50), None);
        assert_eq!(extract_by_keyword(&text, "Net Prim", 70), Some("123,45"));
    }

    #[test]
    fn test_mentions_issuer() {
        assert!(mentions_issuer("axa sigorta a.ş.", Issuer::Axa));
        assert!(mentions_issuer("Doğa Sigorta", Issuer::Doga));
        assert!(!mentions_issuer("Allianz", Issuer::Axa));
    }

    #[test]
    fn test_date_token() {
        let dates: Vec<&str> = DATE_TOKEN
            .captures_iter("01.02.2025 - 3/4/2026 and 2025-01-01")
            .map(|c| c.get(1).unwrap().as_str())
            .collect();
        assert_eq!(dates, vec!["01.02.2025", "3/4/2026"]);
    }

    #[test]
    fn test_plate_token() {
        assert!(PLATE_TOKEN.is_match("34 ABC 123"));
        assert!(PLATE_TOKEN.is_match("016MA0437"));
        assert!(!PLATE_TOKEN.is_match("ABC 123"));
    }
}
