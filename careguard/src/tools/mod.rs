//! Tools the reasoning engine may call, and the registry that holds them.
//!
//! Three lookup tools are provided: [`PatientLookupTool`], [`AllergyCheckTool`] and
//! [`DrugInteractionTool`]. Each resolves every backend failure to text so the model
//! can relay it; see [`RECORDS_UNREACHABLE_MESSAGE`].

mod allergy_check;
mod drug_interaction;
mod patient_lookup;
mod registry;
mod r#trait;

use std::sync::Arc;

use serde_json::Value;

pub use allergy_check::{
    format_allergies, parse_allergy, Allergy, AllergyCheckTool, MISSING_PATIENT_UUID_MESSAGE,
    NO_ALLERGIES_MESSAGE, TOOL_ALLERGY_CHECK,
};
pub use drug_interaction::{
    extract_interaction_text, format_interactions, DrugInteractionTool, DrugReference,
    Interaction, PublicDrugApis, DEFAULT_OPENFDA_BASE_URL, DEFAULT_RXNORM_BASE_URL,
    NO_INTERACTIONS_MESSAGE, TOOL_DRUG_INTERACTION_CHECK, TOO_FEW_DRUGS_MESSAGE,
};
pub use patient_lookup::{
    format_patients, PatientLookupTool, MISSING_SEARCH_FIELD_MESSAGE, NO_PATIENTS_MESSAGE,
    TOOL_PATIENT_LOOKUP,
};
pub use r#trait::Tool;
pub use registry::ToolRegistry;

use crate::records::RecordsApi;

/// Returned by the records tools when the backend cannot be reached or rejects the call.
pub const RECORDS_UNREACHABLE_MESSAGE: &str =
    "Unable to reach medical records system. Please try again.";

/// String form of `v[key]`: strings as-is, numbers and booleans printed, anything else empty.
pub(crate) fn json_str(v: &Value, key: &str) -> String {
    match v.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Registry with the three clinical lookup tools.
pub fn clinical_tools(
    records: Arc<dyn RecordsApi>,
    drugs: Arc<dyn DrugReference>,
) -> ToolRegistry {
    ToolRegistry::new()
        .with(Box::new(PatientLookupTool::new(records.clone())))
        .with(Box::new(AllergyCheckTool::new(records)))
        .with(Box::new(DrugInteractionTool::new(drugs)))
}
