//! Request categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category assigned to one user request. Exactly one per input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Looking up patients, providers or records.
    DataRetrieval,
    /// Medication, interaction and allergy questions. Answered with a disclaimer.
    ClinicalSupport,
    /// Asking the assistant to diagnose. Always blocked.
    DiagnosisRequest,
    /// Asking the assistant to prescribe or recommend treatment. Always blocked.
    TreatmentRequest,
    /// Anything else. Blocked.
    OutOfScope,
}

impl Category {
    /// All categories in classification priority order.
    pub const ALL: [Category; 5] = [
        Category::DiagnosisRequest,
        Category::TreatmentRequest,
        Category::ClinicalSupport,
        Category::DataRetrieval,
        Category::OutOfScope,
    ];

    /// Stable wire form, e.g. `CLINICAL_SUPPORT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::DataRetrieval => "DATA_RETRIEVAL",
            Category::ClinicalSupport => "CLINICAL_SUPPORT",
            Category::DiagnosisRequest => "DIAGNOSIS_REQUEST",
            Category::TreatmentRequest => "TREATMENT_REQUEST",
            Category::OutOfScope => "OUT_OF_SCOPE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `Category::from_str` for an unknown name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}
