//! `patient_lookup`: search the records system by name and/or date of birth.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::records::RecordsApi;
use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::{json_str, Tool, RECORDS_UNREACHABLE_MESSAGE};

pub const TOOL_PATIENT_LOOKUP: &str = "patient_lookup";

const PATIENT_PATH: &str = "/apis/default/api/patient";
const MAX_RESULTS: usize = 5;

pub const MISSING_SEARCH_FIELD_MESSAGE: &str =
    "Error: At least one search field (first_name, last_name, or dob) must be provided.";
pub const NO_PATIENTS_MESSAGE: &str = "No patients found matching criteria.";

#[derive(Debug, Default, Deserialize)]
struct PatientLookupArgs {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    dob: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Renders one patient record as display lines.
fn format_patient(patient: &Value, lines: &mut Vec<String>) {
    let name = format!(
        "{} {}",
        json_str(patient, "fname"),
        json_str(patient, "lname")
    )
    .trim()
    .to_string();
    lines.push(format!("- {} (UUID: {})", name, json_str(patient, "uuid")));
    lines.push(format!(
        "  DOB: {}  Sex: {}",
        json_str(patient, "DOB"),
        json_str(patient, "sex")
    ));

    let phone = Some(json_str(patient, "phone_home"))
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| json_str(patient, "phone_cell"));
    if !phone.is_empty() {
        lines.push(format!("  Phone: {}", phone));
    }

    let address: Vec<String> = ["street", "city", "state", "postal_code"]
        .iter()
        .map(|k| json_str(patient, k))
        .filter(|s| !s.is_empty())
        .collect();
    if !address.is_empty() {
        lines.push(format!("  Address: {}", address.join(", ")));
    }
    lines.push(String::new());
}

/// Formats a patient search response (a bare list or `{"data": [...]}`).
pub fn format_patients(body: &Value) -> String {
    let empty = Vec::new();
    let patients = match body {
        Value::Array(list) => list,
        other => other
            .get("data")
            .and_then(Value::as_array)
            .unwrap_or(&empty),
    };
    if patients.is_empty() {
        return NO_PATIENTS_MESSAGE.to_string();
    }

    let mut lines = Vec::new();
    if patients.len() > MAX_RESULTS {
        lines.push(format!(
            "Multiple patients found ({} total, showing first {}):\n",
            patients.len(),
            MAX_RESULTS
        ));
    } else if patients.len() > 1 {
        lines.push(format!("Multiple patients found ({}):\n", patients.len()));
    }
    for patient in patients.iter().take(MAX_RESULTS) {
        format_patient(patient, &mut lines);
    }
    lines.join("\n").trim().to_string()
}

/// Searches patients by first name, last name and/or date of birth.
pub struct PatientLookupTool {
    records: Arc<dyn RecordsApi>,
}

impl PatientLookupTool {
    pub fn new(records: Arc<dyn RecordsApi>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl Tool for PatientLookupTool {
    fn name(&self) -> &str {
        TOOL_PATIENT_LOOKUP
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_PATIENT_LOOKUP.to_string(),
            description: Some(
                "Search for a patient in the medical records system by name or date of birth. \
                 Search by first name, last name, date of birth (YYYY-MM-DD), or any combination; \
                 at least one field is required. Returns UUID, full name, DOB, sex, phone and address."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "first_name": {"type": "string", "description": "Patient first name"},
                    "last_name": {"type": "string", "description": "Patient last name"},
                    "dob": {"type": "string", "description": "Date of birth, YYYY-MM-DD"}
                }
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let args: PatientLookupArgs = if args.is_null() {
            PatientLookupArgs::default()
        } else {
            serde_json::from_value(args).map_err(|e| ToolSourceError::InvalidInput(e.to_string()))?
        };

        let mut query = Vec::new();
        if let Some(v) = non_empty(&args.first_name) {
            query.push(("fname", v));
        }
        if let Some(v) = non_empty(&args.last_name) {
            query.push(("lname", v));
        }
        if let Some(v) = non_empty(&args.dob) {
            query.push(("DOB", v));
        }
        if query.is_empty() {
            return Ok(ToolCallContent::text(MISSING_SEARCH_FIELD_MESSAGE));
        }

        match self.records.get_json(PATIENT_PATH, &query).await {
            Ok(body) => Ok(ToolCallContent::text(format_patients(&body))),
            Err(e) => {
                error!(error = %e, "patient lookup failed");
                Ok(ToolCallContent::text(RECORDS_UNREACHABLE_MESSAGE))
            }
        }
    }
}
