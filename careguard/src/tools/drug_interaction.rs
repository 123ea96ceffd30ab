//! `drug_interaction_check`: documented interactions from FDA drug labels.
//!
//! Names are normalised through RxNorm, then each ordered pair (A, B) is checked by
//! searching A's openFDA label for B in its drug interactions section. Both
//! directions are checked because labelling is not symmetric; results are reported
//! once per unordered pair.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
use crate::tools::Tool;

pub const TOOL_DRUG_INTERACTION_CHECK: &str = "drug_interaction_check";

pub const DEFAULT_RXNORM_BASE_URL: &str = "https://rxnav.nlm.nih.gov/REST";
pub const DEFAULT_OPENFDA_BASE_URL: &str = "https://api.fda.gov";

pub const TOO_FEW_DRUGS_MESSAGE: &str =
    "Error: At least two drug names are required to check interactions.";
pub const NO_INTERACTIONS_MESSAGE: &str = "No known interactions found between these medications.";

const RELEVANT_MAX_CHARS: usize = 600;
const FALLBACK_MAX_CHARS: usize = 400;

/// Drug reference lookups used by [`DrugInteractionTool`].
#[async_trait]
pub trait DrugReference: Send + Sync {
    /// Canonical drug name for `name`, or `None` when it cannot be resolved.
    async fn resolve_name(&self, name: &str) -> Option<String>;

    /// Text from `drug_a`'s label describing its interaction with `drug_b`, if any.
    async fn label_interaction(&self, drug_a: &str, drug_b: &str) -> Option<String>;
}

/// RxNorm + openFDA over HTTP. Both APIs are public and unauthenticated.
pub struct PublicDrugApis {
    http: reqwest::Client,
    rxnorm_base: String,
    openfda_base: String,
    rxnorm_timeout: Duration,
    label_timeout: Duration,
}

impl PublicDrugApis {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            rxnorm_base: DEFAULT_RXNORM_BASE_URL.to_string(),
            openfda_base: DEFAULT_OPENFDA_BASE_URL.to_string(),
            rxnorm_timeout: Duration::from_secs(10),
            label_timeout: Duration::from_secs(15),
        }
    }

    pub fn with_base_urls(mut self, rxnorm: impl Into<String>, openfda: impl Into<String>) -> Self {
        self.rxnorm_base = rxnorm.into().trim_end_matches('/').to_string();
        self.openfda_base = openfda.into().trim_end_matches('/').to_string();
        self
    }

    /// Timeout for each RxNorm request; label searches get half again as long.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.rxnorm_timeout = timeout;
        self.label_timeout = timeout + timeout / 2;
        self
    }

    async fn send_get(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> reqwest::Result<reqwest::Response> {
        self.http
            .get(url)
            .query(query)
            .timeout(self.rxnorm_timeout)
            .send()
            .await
    }

    async fn try_resolve(&self, name: &str) -> Result<Option<String>, reqwest::Error> {
        let url = format!("{}/rxcui.json", self.rxnorm_base);
        let body: Value = self
            .send_get(&url, &[("name", name)])
            .await?
            .error_for_status()?
            .json()
            .await?;
        let Some(id) = body
            .pointer("/idGroup/rxnormId/0")
            .and_then(Value::as_str)
        else {
            return Ok(None);
        };

        let url = format!("{}/rxcui/{}/properties.json", self.rxnorm_base, id);
        let props: Value = self
            .send_get(&url, &[])
            .await?
            .error_for_status()?
            .json()
            .await?;
        let canonical = props
            .pointer("/properties/name")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(name);
        Ok(Some(canonical.to_string()))
    }

    async fn try_label(&self, drug_a: &str, drug_b: &str) -> Result<Option<String>, reqwest::Error> {
        // openFDA needs a literal `+AND+`, so the query string is built by hand.
        let url = format!(
            "{}/drug/label.json?search=openfda.generic_name:\"{}\"+AND+drug_interactions:\"{}\"&limit=1",
            self.openfda_base,
            urlencoding::encode(drug_a),
            urlencoding::encode(drug_b),
        );
        let res = self.http.get(&url).timeout(self.label_timeout).send().await?;
        if res.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: Value = res.error_for_status()?.json().await?;
        let section = body
            .pointer("/results/0/drug_interactions/0")
            .and_then(Value::as_str);
        Ok(section.map(|text| extract_interaction_text(text, drug_b)))
    }
}

#[async_trait]
impl DrugReference for PublicDrugApis {
    async fn resolve_name(&self, name: &str) -> Option<String> {
        match self.try_resolve(name).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(drug = %name, error = %e, "RxNorm lookup failed");
                None
            }
        }
    }

    async fn label_interaction(&self, drug_a: &str, drug_b: &str) -> Option<String> {
        match self.try_label(drug_a, drug_b).await {
            Ok(found) => found,
            Err(e) => {
                warn!(drug_a = %drug_a, drug_b = %drug_b, error = %e, "openFDA label search failed");
                None
            }
        }
    }
}

fn cached_regex(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

/// Strips a leading section number such as "7 DRUG INTERACTIONS" or "7.1".
fn clean_label_text(raw: &str) -> String {
    static SECTION: OnceLock<Option<Regex>> = OnceLock::new();
    match cached_regex(&SECTION, r"^\d+(?:\.\d+)?\s+(?:DRUG INTERACTIONS\s*)?") {
        Some(re) => re.replacen(raw, 1, "").trim().to_string(),
        None => raw.trim().to_string(),
    }
}

/// Splits a label section into paragraphs, or into sentences when it has no
/// blank-line breaks.
fn split_paragraphs(text: &str) -> Vec<&str> {
    static PARAGRAPH: OnceLock<Option<Regex>> = OnceLock::new();
    static SENTENCE: OnceLock<Option<Regex>> = OnceLock::new();

    let paragraphs: Vec<&str> = match cached_regex(&PARAGRAPH, r"\n{2,}|\r\n{2,}") {
        Some(re) => re.split(text).collect(),
        None => vec![text],
    };
    if paragraphs.len() > 1 {
        return paragraphs;
    }

    // Sentence break: whitespace after a period and before a capital letter.
    let Some(re) = cached_regex(&SENTENCE, r"\.(\s+)[A-Z]") else {
        return vec![text];
    };
    let mut pieces = Vec::new();
    let mut start = 0;
    for caps in re.captures_iter(text) {
        if let Some(ws) = caps.get(1) {
            pieces.push(&text[start..ws.start()]);
            start = ws.end();
        }
    }
    pieces.push(&text[start..]);
    pieces
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Picks the parts of a drug interactions section that mention `drug_b`.
///
/// Matching paragraphs are joined (600 chars max); without a match the cleaned
/// start of the section is returned (400 chars max).
pub fn extract_interaction_text(full_text: &str, drug_b: &str) -> String {
    let needle = drug_b.to_lowercase();
    let relevant: Vec<String> = split_paragraphs(full_text)
        .into_iter()
        .filter(|p| p.to_lowercase().contains(&needle))
        .map(clean_label_text)
        .collect();
    if relevant.is_empty() {
        truncate_chars(&clean_label_text(full_text), FALLBACK_MAX_CHARS)
    } else {
        truncate_chars(&relevant.join(" "), RELEVANT_MAX_CHARS)
    }
}

/// One reported interaction between an unordered pair of drugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub drug_pair: String,
    pub description: String,
}

/// Reply when every given name resolves to one drug.
fn same_drug_message(names: &[&str], drug: &str) -> String {
    format!(
        "{} all resolve to the same drug ({}), so there is no pair to check for interactions.",
        names.join(", "),
        drug
    )
}

/// Formats interactions and unresolved names for the model.
pub fn format_interactions(interactions: &[Interaction], unresolved: &[String]) -> String {
    let mut lines = Vec::new();
    if !unresolved.is_empty() {
        for name in unresolved {
            lines.push(format!("Could not find drug: {}. Please verify spelling.", name));
        }
        lines.push(String::new());
    }
    if !interactions.is_empty() {
        lines.push(format!("Found {} interaction(s):\n", interactions.len()));
        for ix in interactions {
            lines.push(format!("- {}", ix.drug_pair));
            lines.push(format!("  {}", ix.description));
            lines.push(String::new());
        }
    } else if unresolved.is_empty() {
        lines.push(NO_INTERACTIONS_MESSAGE.to_string());
    }
    lines.join("\n").trim().to_string()
}

#[derive(Debug, Default, Deserialize)]
struct DrugInteractionArgs {
    #[serde(default)]
    drug_names: Vec<String>,
}

/// Checks every pair of the given drugs for documented label interactions.
pub struct DrugInteractionTool {
    reference: Arc<dyn DrugReference>,
}

impl DrugInteractionTool {
    pub fn new(reference: Arc<dyn DrugReference>) -> Self {
        Self { reference }
    }

    /// Runs the full check for `names` and returns the formatted report.
    pub async fn check(&self, names: &[String]) -> String {
        let mut seen = HashSet::new();
        let names: Vec<&str> = names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty() && seen.insert(n.to_string()))
            .collect();
        if names.len() < 2 {
            return TOO_FEW_DRUGS_MESSAGE.to_string();
        }

        let resolved = join_all(names.iter().map(|n| self.reference.resolve_name(n))).await;
        let mut canonical: Vec<String> = Vec::new();
        let mut unresolved: Vec<String> = Vec::new();
        for (name, result) in names.iter().zip(resolved) {
            match result {
                Some(c) if !canonical.contains(&c) => canonical.push(c),
                Some(_) => {}
                None => unresolved.push(name.to_string()),
            }
        }
        debug!(canonical = ?canonical, unresolved = ?unresolved, "resolved drug names");
        if canonical.len() < 2 {
            if let ([drug], true) = (canonical.as_slice(), unresolved.is_empty()) {
                return same_drug_message(&names, drug);
            }
            return format_interactions(&[], &unresolved);
        }

        let mut pairs = Vec::new();
        for (i, a) in canonical.iter().enumerate() {
            for b in &canonical[i + 1..] {
                pairs.push((a.as_str(), b.as_str()));
                pairs.push((b.as_str(), a.as_str()));
            }
        }
        let results = join_all(
            pairs
                .iter()
                .map(|(a, b)| self.reference.label_interaction(a, b)),
        )
        .await;

        let mut reported = HashSet::new();
        let mut interactions = Vec::new();
        for ((a, b), result) in pairs.iter().zip(results) {
            let Some(description) = result else {
                continue;
            };
            let (first, second) = if a <= b { (*a, *b) } else { (*b, *a) };
            if !reported.insert((first, second)) {
                continue;
            }
            interactions.push(Interaction {
                drug_pair: format!("{} + {}", first, second),
                description,
            });
        }
        format_interactions(&interactions, &unresolved)
    }
}

#[async_trait]
impl Tool for DrugInteractionTool {
    fn name(&self) -> &str {
        TOOL_DRUG_INTERACTION_CHECK
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: TOOL_DRUG_INTERACTION_CHECK.to_string(),
            description: Some(
                "Check for dangerous interactions between two or more drugs using FDA-approved \
                 drug labelling. Provide a list of drug names, e.g. [\"aspirin\", \"warfarin\"]; \
                 every pair is checked."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "drug_names": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Drug names to check against each other"
                    }
                },
                "required": ["drug_names"]
            }),
        }
    }

    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
        let args: DrugInteractionArgs = if args.is_null() {
            DrugInteractionArgs::default()
        } else {
            serde_json::from_value(args).map_err(|e| ToolSourceError::InvalidInput(e.to_string()))?
        };
        Ok(ToolCallContent::text(self.check(&args.drug_names).await))
    }
}
