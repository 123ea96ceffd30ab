//! Tool contract types shared by the registry, the LLM clients and the ReAct nodes.
//!
//! A tool is described to the model by a [`ToolSpec`] and answers with
//! [`ToolCallContent`]. Failures that should reach the model as text are returned
//! as `Ok` content by the tools themselves; [`ToolSourceError`] is for contract
//! violations (unknown tool, malformed arguments, transport failure).

use serde_json::Value;
use thiserror::Error;

/// Tool specification sent to the model.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name the model uses in a tool call.
    pub name: String,
    /// Human-readable description for the model.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallContent {
    pub text: String,
}

impl ToolCallContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Errors from calling tools.
///
/// **Interaction**: Returned by `Tool::call` and `ToolRegistry::call`; the act node
/// turns them into result text for the model.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
}
