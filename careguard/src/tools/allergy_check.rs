//! `allergy_check`: documented allergies for a patient from the FHIR API.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::records::RecordsApi;
use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::{json_str, Tool, RECORDS_UNREACHABLE_MESSAGE};

pub const TOOL_ALLERGY_CHECK: &str = "allergy_check";

const ALLERGY_PATH: &str = "/apis/default/fhir/AllergyIntolerance";

pub const MISSING_PATIENT_UUID_MESSAGE: &str = "Error: patient_uuid is required.";
pub const NO_ALLERGIES_MESSAGE: &str = "No allergies documented for this patient.";

#[derive(Debug, Default, Deserialize)]
struct AllergyCheckArgs {
    #[serde(default)]
    patient_uuid: Option<String>,
}

/// One parsed AllergyIntolerance resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allergy {
    pub substance: String,
    pub category: String,
    pub criticality: String,
    pub reactions: Vec<String>,
}

fn strip_html(html: &str) -> String {
    static TAGS: OnceLock<Option<Regex>> = OnceLock::new();
    match TAGS.get_or_init(|| Regex::new(r"<[^>]+>").ok()) {
        Some(re) => re.replace_all(html, "").trim().to_string(),
        None => html.trim().to_string(),
    }
}

fn array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// True when the coding carries a data-absent-reason instead of a real code.
fn is_absent_reason(codings: &[Value]) -> bool {
    codings
        .iter()
        .any(|c| json_str(c, "system").contains("data-absent-reason"))
}

/// Extracts substance, category, criticality and reactions from a FHIR resource.
pub fn parse_allergy(resource: &Value) -> Allergy {
    let code = resource.get("code").cloned().unwrap_or(Value::Null);
    let codings = array(&code, "coding");

    let mut substance = json_str(&code, "text");
    if substance.is_empty() && !codings.is_empty() && !is_absent_reason(codings) {
        substance = json_str(&codings[0], "display");
    }
    if substance.is_empty() {
        let div = resource
            .get("text")
            .map(|t| json_str(t, "div"))
            .unwrap_or_default();
        if !div.is_empty() {
            substance = strip_html(&div);
        }
    }
    if substance.is_empty() {
        substance = "Unknown substance".to_string();
    }

    let category = array(resource, "category")
        .first()
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let criticality = resource
        .get("criticality")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let mut reactions: Vec<String> = Vec::new();
    for reaction in array(resource, "reaction") {
        for manifestation in array(reaction, "manifestation") {
            let text = array(manifestation, "coding")
                .first()
                .map(|c| json_str(c, "display"))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| json_str(manifestation, "text"));
            if !text.is_empty() {
                reactions.push(text);
            }
        }
        let description = json_str(reaction, "description");
        if !description.is_empty() && !reactions.contains(&description) {
            reactions.push(description);
        }
    }

    Allergy {
        substance,
        category,
        criticality,
        reactions,
    }
}

/// Formats a FHIR bundle of AllergyIntolerance entries.
pub fn format_allergies(bundle: &Value) -> String {
    let entries = array(bundle, "entry");
    if entries.is_empty() {
        return NO_ALLERGIES_MESSAGE.to_string();
    }
    let allergies: Vec<Allergy> = entries
        .iter()
        .map(|entry| parse_allergy(entry.get("resource").unwrap_or(entry)))
        .collect();

    let mut lines = vec![format!(
        "Found {} documented allergy(ies):\n",
        allergies.len()
    )];
    for a in &allergies {
        lines.push(format!("- {}", a.substance));
        lines.push(format!(
            "  Category: {}  |  Criticality: {}",
            a.category, a.criticality
        ));
        if !a.reactions.is_empty() {
            lines.push(format!("  Reactions: {}", a.reactions.join(", ")));
        }
        lines.push(String::new());
    }
    lines.join("\n").trim().to_string()
}

/// Lists a patient's documented allergies by patient UUID.
pub struct AllergyCheckTool {
    records: Arc<dyn RecordsApi>,
}

impl AllergyCheckTool {
    pub fn new(records: Arc<dyn RecordsApi>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl Tool for AllergyCheckTool {
    fn name(&self) -> &str {
        TOOL_ALLERGY_CHECK
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_ALLERGY_CHECK.to_string(),
            description: Some(
                "Retrieve a patient's documented allergies from the medical records system. \
                 Provide the patient's UUID (from patient_lookup). Returns substance, category, \
                 criticality and documented reactions."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "patient_uuid": {"type": "string", "description": "Patient UUID from patient_lookup"}
                },
                "required": ["patient_uuid"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let args: AllergyCheckArgs = if args.is_null() {
            AllergyCheckArgs::default()
        } else {
            serde_json::from_value(args).map_err(|e| ToolSourceError::InvalidInput(e.to_string()))?
        };
        let Some(uuid) = args
            .patient_uuid
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            return Ok(ToolCallContent::text(MISSING_PATIENT_UUID_MESSAGE));
        };

        match self.records.get_json(ALLERGY_PATH, &[("patient", uuid)]).await {
            Ok(bundle) => Ok(ToolCallContent::text(format_allergies(&bundle))),
            Err(e) => {
                error!(error = %e, "allergy check failed");
                Ok(ToolCallContent::text(RECORDS_UNREACHABLE_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substance_prefers_code_text() {
        let a = parse_allergy(&json!({
            "code": {"text": "Penicillin", "coding": [{"display": "PCN"}]},
            "category": ["medication"],
            "criticality": "high"
        }));
        assert_eq!(a.substance, "Penicillin");
        assert_eq!(a.category, "medication");
        assert_eq!(a.criticality, "high");
        assert!(a.reactions.is_empty());
    }

    #[test]
    fn data_absent_coding_falls_back_to_narrative() {
        let a = parse_allergy(&json!({
            "code": {"coding": [{
                "system": "http://terminology.hl7.org/CodeSystem/data-absent-reason",
                "display": "Unknown"
            }]},
            "text": {"div": "<div xmlns=\"http://www.w3.org/1999/xhtml\">Peanuts</div>"}
        }));
        assert_eq!(a.substance, "Peanuts");
        assert_eq!(a.category, "unknown");
        assert_eq!(a.criticality, "unknown");
    }

    #[test]
    fn real_coding_display_is_used() {
        let a = parse_allergy(&json!({"code": {"coding": [{"system": "http://snomed.info/sct", "display": "Latex"}]}}));
        assert_eq!(a.substance, "Latex");
        assert_eq!(parse_allergy(&json!({})).substance, "Unknown substance");
    }

    #[test]
    fn reactions_collect_manifestations_and_descriptions() {
        let a = parse_allergy(&json!({
            "code": {"text": "Sulfa"},
            "reaction": [
                {"manifestation": [{"coding": [{"display": "Hives"}]}, {"text": "Rash"}], "description": "Hives"},
                {"manifestation": [], "description": "Swelling"}
            ]
        }));
        assert_eq!(a.reactions, vec!["Hives", "Rash", "Swelling"]);
    }

    #[test]
    fn bundle_formatting() {
        let text = format_allergies(&json!({
            "entry": [
                {"resource": {"code": {"text": "Penicillin"}, "category": ["medication"], "criticality": "high",
                    "reaction": [{"manifestation": [{"text": "Anaphylaxis"}]}]}},
                {"resource": {"code": {"text": "Peanuts"}, "category": ["food"]}}
            ]
        }));
        assert_eq!(
            text,
            "Found 2 documented allergy(ies):\n\n- Penicillin\n  Category: medication  |  Criticality: high\n  Reactions: Anaphylaxis\n\n- Peanuts\n  Category: food  |  Criticality: unknown"
        );
    }

    #[test]
    fn empty_bundle() {
        assert_eq!(format_allergies(&json!({"resourceType": "Bundle"})), NO_ALLERGIES_MESSAGE);
        assert_eq!(format_allergies(&json!({"entry": []})), NO_ALLERGIES_MESSAGE);
    }
}
