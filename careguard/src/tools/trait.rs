use async_trait::async_trait;
use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};

/// A single tool the reasoning engine may call.
///
/// Each tool has a unique name, a specification (description and JSON schema) and
/// the call logic. Tools are registered in a [`ToolRegistry`](super::ToolRegistry).
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use careguard::tools::Tool;
/// use careguard::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Tool for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "echo".to_string(),
///             description: Some("Echoes its input".to_string()),
///             input_schema: serde_json::json!({"type": "object"}),
///         }
///     }
///
///     async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
///         Ok(ToolCallContent::text(args.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of this tool within a registry.
    fn name(&self) -> &str;

    /// Description and argument schema shown to the model.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool.
    ///
    /// Backend failures the model should see (nothing found, service unreachable) are
    /// returned as `Ok` text; `Err` is reserved for malformed calls and transport faults.
    async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError>;
}
