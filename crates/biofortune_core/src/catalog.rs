//! crates/biofortune_core/src/catalog.rs
//!
//! The static remedy catalog and the list of critical symptoms.

use crate::domain::RemedyRecord;

/// Symptom keyword → remedy, in definition order.
///
/// Keywords are lowercase, unique and non-empty.
pub static CATALOG: &[(&str, RemedyRecord)] = &[
    (
        "stress",
        RemedyRecord {
            english_name: "Tulsi (Holy Basil)",
            local_name: "तुलसी",
            image_ref: Some("tulsi.jpg"),
            usage_instructions: "Drink tulsi tea twice a day.",
            pros: &["Reduces stress", "Boosts immunity"],
            cons: &["Avoid if pregnant", "May lower blood sugar"],
        },
    ),
    (
        "fatigue",
        RemedyRecord {
            english_name: "Ashwagandha",
            local_name: "अश्वगन्धा",
            image_ref: Some("ashwagandha.jpg"),
            usage_instructions: "Take 1 tsp of ashwagandha powder with warm milk at night.",
            pros: &["Boosts energy", "Improves sleep"],
            cons: &["Avoid during pregnancy"],
        },
    ),
    (
        "indigestion",
        RemedyRecord {
            english_name: "Ginger",
            local_name: "अदुवा",
            image_ref: Some("ginger.jpg"),
            usage_instructions: "Boil ginger in water and drink after meals.",
            pros: &["Improves digestion", "Reduces nausea"],
            cons: &["May cause heartburn if taken in excess"],
        },
    ),
    (
        "diarrhea",
        RemedyRecord {
            english_name: "Pomegranate Peel",
            local_name: "अनारको बोक्रा",
            image_ref: Some("pomegranate.jpg"),
            usage_instructions: "Boil peel in water and sip slowly.",
            pros: &["Reduces loose motion", "Antibacterial"],
            cons: &["Avoid if constipated"],
        },
    ),
    (
        "eye strain",
        RemedyRecord {
            english_name: "Triphala",
            local_name: "त्रिफला",
            image_ref: Some("triphala.jpg"),
            usage_instructions: "Wash eyes with cooled Triphala decoction.",
            pros: &["Improves eye health", "Reduces dryness"],
            cons: &["May cause temporary stinging"],
        },
    ),
    (
        "headache",
        RemedyRecord {
            english_name: "Peppermint",
            local_name: "पुदिना",
            image_ref: Some("peppermint.jpg"),
            usage_instructions: "Apply diluted peppermint oil to the temples.",
            pros: &["Relieves headache", "Cools the skin"],
            cons: &["Can cause irritation if not diluted"],
        },
    ),
    (
        "joint pain",
        RemedyRecord {
            english_name: "Turmeric",
            local_name: "बेसार",
            image_ref: Some("turmeric.jpg"),
            usage_instructions: "Mix turmeric with warm milk and drink.",
            pros: &["Anti-inflammatory", "Eases pain"],
            cons: &["May cause upset stomach in high doses"],
        },
    ),
];

/// Symptoms that should send the user to a doctor instead of the herb shelf.
pub static CRITICAL_KEYWORDS: &[&str] = &[
    "chest pain",
    "fainting",
    "severe bleeding",
    "unconscious",
    "shortness of breath",
    "severe abdominal pain",
];

pub const CRITICAL_MESSAGE: &str =
    "Your symptoms seem serious. Please consult a doctor immediately.";

/// Looks up a remedy by its exact catalog keyword.
pub fn remedy_for_keyword(keyword: &str) -> Option<&'static RemedyRecord> {
    CATALOG
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, remedy)| remedy)
}

/// Catalog entries ordered for matching: longest keyword first, then
/// definition order.
pub(crate) fn entries_by_match_priority() -> Vec<(&'static str, &'static RemedyRecord)> {
    let mut entries: Vec<_> = CATALOG.iter().map(|(k, r)| (*k, r)).collect();
    // `sort_by` is stable, so equal lengths keep definition order.
    entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    entries
}
