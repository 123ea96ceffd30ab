//! Guard verdicts and the fixed user-facing messages.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::category::Category;
use super::classifier::Classifier;

pub const DIAGNOSIS_MESSAGE: &str = "I'm not able to provide medical diagnoses. Please consult a qualified healthcare provider for diagnostic assessments.";

pub const TREATMENT_MESSAGE: &str = "I'm not able to recommend treatments or prescribe medications. Please consult a qualified healthcare provider.";

pub const OUT_OF_SCOPE_MESSAGE: &str = "I'm a healthcare records assistant. I can help you look up patient information, check drug interactions, and review allergies.";

/// Appended to every answer to a clinical-support request.
pub const CLINICAL_DISCLAIMER: &str = "\n\n---\n*Disclaimer: This information is for clinical support only. Please verify with qualified healthcare providers.*";

/// Block message for a category, `None` for categories that are answered.
pub fn block_message_for(category: Category) -> Option<&'static str> {
    match category {
        Category::DiagnosisRequest => Some(DIAGNOSIS_MESSAGE),
        Category::TreatmentRequest => Some(TREATMENT_MESSAGE),
        Category::OutOfScope => Some(OUT_OF_SCOPE_MESSAGE),
        Category::DataRetrieval | Category::ClinicalSupport => None,
    }
}

/// Outcome of the scope guard for one request.
///
/// `block_message` is `Some` exactly when `allowed` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardVerdict {
    pub allowed: bool,
    pub category: Category,
    pub block_message: Option<String>,
}

impl GuardVerdict {
    pub fn from_classification(category: Category, block_message: Option<&str>) -> Self {
        Self {
            allowed: block_message.is_none(),
            category,
            block_message: block_message.map(str::to_string),
        }
    }
}

impl Classifier {
    /// Classifies `text` and wraps the result in a [`GuardVerdict`].
    pub fn apply(&self, text: &str) -> GuardVerdict {
        let (category, message) = self.classify(text);
        GuardVerdict::from_classification(category, message)
    }
}

/// [`Classifier::apply`] with the default keyword tables.
pub fn apply_guard(text: &str) -> GuardVerdict {
    static DEFAULT: OnceLock<Classifier> = OnceLock::new();
    DEFAULT.get_or_init(Classifier::default).apply(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_categories_have_no_message() {
        let v = apply_guard("Look up patient Smith");
        assert!(v.allowed);
        assert_eq!(v.category, Category::DataRetrieval);
        assert!(v.block_message.is_none());

        let v = apply_guard("check drug interactions");
        assert!(v.allowed);
        assert_eq!(v.category, Category::ClinicalSupport);
    }

    #[test]
    fn blocked_categories_carry_their_message() {
        let v = apply_guard("Diagnose my headache");
        assert!(!v.allowed);
        assert_eq!(v.block_message.as_deref(), Some(DIAGNOSIS_MESSAGE));

        let v = apply_guard("What should I take for a cold?");
        assert!(!v.allowed);
        assert_eq!(v.category, Category::TreatmentRequest);
        assert_eq!(v.block_message.as_deref(), Some(TREATMENT_MESSAGE));

        let v = apply_guard("Tell me a joke");
        assert!(!v.allowed);
        assert_eq!(v.block_message.as_deref(), Some(OUT_OF_SCOPE_MESSAGE));
    }

    #[test]
    fn message_table_is_total() {
        for c in Category::ALL {
            let v = GuardVerdict::from_classification(c, block_message_for(c));
            assert_eq!(v.allowed, v.block_message.is_none());
        }
    }

    #[test]
    fn disclaimer_text() {
        assert!(CLINICAL_DISCLAIMER.starts_with("\n\n---\n"));
        assert!(CLINICAL_DISCLAIMER.contains("clinical support only"));
    }
}
