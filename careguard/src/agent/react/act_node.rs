//! Act node: execute tool_calls against the registry and write tool_results.
//!
//! Tool failures never fail the node; they become result text the model can read
//! and react to on the next think step.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::{ReActState, ToolResult};
use crate::tools::ToolRegistry;

/// Result text for a failed tool call. Placeholders: `{tool_name}`, `{tool_kwargs}`, `{error}`.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str = "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

pub struct ActNode {
    tools: Arc<ToolRegistry>,
}

impl ActNode {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self { tools }
    }
}

/// Parses the model's argument string; empty or malformed input becomes `{}`.
///
/// Some providers double-encode arguments as a JSON string; that inner string is
/// parsed once more.
fn parse_tool_arguments(arguments: &str) -> Value {
    let raw = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        match serde_json::from_str(arguments) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
                serde_json::json!({})
            }
        }
    };
    if let Some(s) = raw.as_str() {
        serde_json::from_str(s).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "nested tool arguments JSON parse failed");
            raw
        })
    } else {
        raw
    }
}

fn format_execution_error(tool_name: &str, args: &Value, error: &str) -> String {
    DEFAULT_EXECUTION_ERROR_TEMPLATE
        .replace("{tool_name}", tool_name)
        .replace("{tool_kwargs}", &args.to_string())
        .replace("{error}", error)
}

#[async_trait]
impl Node<ReActState> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let mut tool_results = Vec::with_capacity(state.tool_calls.len());
        for tc in &state.tool_calls {
            let args = parse_tool_arguments(&tc.arguments);
            tracing::debug!(tool = %tc.name, "calling tool");
            let result = match self.tools.call(&tc.name, args.clone()).await {
                Ok(content) => ToolResult {
                    call_id: tc.id.clone(),
                    name: Some(tc.name.clone()),
                    content: content.text,
                    is_error: false,
                },
                Err(e) => {
                    tracing::warn!(tool = %tc.name, error = %e, "tool call failed");
                    ToolResult {
                        call_id: tc.id.clone(),
                        name: Some(tc.name.clone()),
                        content: format_execution_error(&tc.name, &args, &e.to_string()),
                        is_error: true,
                    }
                }
            };
            tool_results.push(result);
        }

        let new_state = ReActState {
            messages: state.messages,
            tool_calls: state.tool_calls,
            tool_results,
            turn_count: state.turn_count,
        };
        Ok((new_state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ToolCall;
    use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
    use crate::tools::Tool;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "echo".into(),
                description: None,
                input_schema: serde_json::json!({"type": "object"}),
            }
        }
        async fn call(&self, args: Value) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent::text(args.to_string()))
        }
    }

    fn call(name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            name: name.into(),
            arguments: arguments.into(),
            id: Some(format!("id-{name}")),
        }
    }

    #[test]
    fn parse_tool_arguments_handles_empty_bad_and_nested() {
        assert_eq!(parse_tool_arguments(""), serde_json::json!({}));
        assert_eq!(parse_tool_arguments("{not json"), serde_json::json!({}));
        assert_eq!(
            parse_tool_arguments(r#""{\"a\":1}""#),
            serde_json::json!({"a": 1})
        );
        assert_eq!(parse_tool_arguments(r#"{"a":1}"#), serde_json::json!({"a": 1}));
    }

    #[tokio::test]
    async fn act_runs_tools_and_reports_unknown_tool_as_text() {
        let tools = Arc::new(ToolRegistry::new().with(Box::new(Echo)));
        let node = ActNode::new(tools);
        let state = ReActState {
            tool_calls: vec![call("echo", r#"{"x":"y"}"#), call("missing", "{}")],
            ..Default::default()
        };
        let (state, next) = node.run(state).await.unwrap();
        assert!(matches!(next, Next::Continue));
        assert_eq!(state.tool_results.len(), 2);
        assert_eq!(state.tool_results[0].content, r#"{"x":"y"}"#);
        assert!(!state.tool_results[0].is_error);
        let err = &state.tool_results[1];
        assert!(err.is_error);
        assert!(err.content.starts_with("Error executing tool 'missing'"), "{}", err.content);
        assert!(err.content.contains("tool not found: missing"));
    }
}
