//! Disease knowledge base
//!
//! This module provides:
//! - The ordered class-label table matching the classifier's output layer
//! - Descriptive records (description, cause, treatment) per disease
//! - Lookup helpers with a fixed fallback record for unknown names
//!
//! The label order is a build-time contract with the trained artifact: index
//! `i` of the probability vector is the disease `CLASS_LABELS[i]`.

mod records;

use serde::Serialize;

pub use records::DISEASE_RECORDS;

/// Number of disease classes the classifier predicts
pub const NUM_CLASSES: usize = 24;

/// Label substituted when inference fails
pub const FALLBACK_LABEL: &str = "Unknown or No Disease";

/// Class labels in output-layer order
pub const CLASS_LABELS: [&str; NUM_CLASSES] = [
    "Acne",                  // 0
    "Actinic Keratosis",     // 1
    "Benign Tumors",         // 2
    "Bullous",               // 3
    "Candidiasis",           // 4
    "Drug Eruption",         // 5
    "Eczema",                // 6
    "Hives (Urticaria)",     // 7
    "Infestations Bites",    // 8
    "Lichen",                // 9
    "Lupus",                 // 10
    "Melanoma",              // 11
    "Moles",                 // 12
    "Psoriasis",             // 13
    "Rosacea",               // 14
    "Seborrh Keratoses",     // 15
    "Skin Cancer",           // 16
    "Sunlight Damage",       // 17
    "Tinea",                 // 18
    "Unknown or No Disease", // 19
    "Vascular Tumors",       // 20
    "Vasculitis",            // 21
    "Vitiligo",              // 22
    "Warts",                 // 23
];

/// Descriptive information about one disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiseaseRecord {
    pub name: &'static str,
    pub description: &'static str,
    pub cause: &'static str,
    pub treatment: &'static str,
}

impl DiseaseRecord {
    /// Record returned for names the knowledge base has no entry for
    pub const fn unknown() -> Self {
        Self {
            name: "Unknown",
            description: "No information available.",
            cause: "Unknown.",
            treatment: "Consult a doctor for further evaluation.",
        }
    }
}

/// Get the label for a given class index
pub fn class_label(index: usize) -> Option<&'static str> {
    CLASS_LABELS.get(index).copied()
}

/// Get the class index for a given label
pub fn class_index(label: &str) -> Option<usize> {
    CLASS_LABELS.iter().position(|&l| l == label)
}

/// Find the record for a disease name, if the knowledge base has one
pub fn find_record(name: &str) -> Option<&'static DiseaseRecord> {
    DISEASE_RECORDS.iter().find(|record| record.name == name)
}

/// Look up a disease record, falling back to the "no information" record
pub fn lookup(name: &str) -> DiseaseRecord {
    find_record(name).copied().unwrap_or_else(DiseaseRecord::unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_label() {
        assert_eq!(class_label(0), Some("Acne"));
        assert_eq!(class_label(19), Some(FALLBACK_LABEL));
        assert_eq!(class_label(23), Some("Warts"));
        assert_eq!(class_label(24), None);
    }

    #[test]
    fn test_class_index() {
        assert_eq!(class_index("Melanoma"), Some(11));
        assert_eq!(class_index("Hives (Urticaria)"), Some(7));
        assert_eq!(class_index("Sunburn"), None);
    }

    #[test]
    fn test_labels_are_unique() {
        for (i, label) in CLASS_LABELS.iter().enumerate() {
            assert_eq!(class_index(label), Some(i), "duplicate label {}", label);
        }
    }

    #[test]
    fn test_every_label_has_a_record() {
        assert_eq!(DISEASE_RECORDS.len(), NUM_CLASSES);
        for label in CLASS_LABELS {
            let record = find_record(label).unwrap_or_else(|| panic!("missing record for {}", label));
            assert!(!record.description.is_empty());
            assert!(!record.treatment.is_empty());
        }
    }

    #[test]
    fn test_records_follow_label_order() {
        for (label, record) in CLASS_LABELS.iter().zip(DISEASE_RECORDS.iter()) {
            assert_eq!(*label, record.name);
        }
    }

    #[test]
    fn test_lookup_unknown_name_uses_fallback_record() {
        let record = lookup("Sunburn");
        assert_eq!(record.description, "No information available.");
        assert_eq!(record.cause, "Unknown.");
        assert_eq!(record.treatment, "Consult a doctor for further evaluation.");
    }

    #[test]
    fn test_fallback_label_record() {
        let record = lookup(FALLBACK_LABEL);
        assert_eq!(record.description, "No recognizable skin disease detected.");
        assert_eq!(record.cause, "N/A");
    }
}
