//! Anthropic Messages API client implementing `LlmClient` (ChatAnthropic).
//!
//! System messages become the top-level `system` field. User and assistant turns
//! are sent as text; empty turns are dropped and consecutive turns of the same role
//! are merged, since the API requires non-empty, alternating content. Tool specs
//! are sent as `tools`; `tool_use` blocks in the reply become [`ToolCall`]s.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client.
///
/// **Interaction**: Implements `LlmClient`; used by the think node like `MockLlm`.
pub struct ChatAnthropic {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
}

impl ChatAnthropic {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Overrides the API base URL (e.g. a proxy). Trailing slashes are ignored.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Uses a preconfigured HTTP client (timeouts, proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url)
    }
}

/// Builds the request body for the Messages API.
pub(crate) fn build_request_body(
    model: &str,
    max_tokens: u32,
    messages: &[Message],
    tools: &[ToolSpec],
) -> Value {
    let system: Vec<&str> = messages
        .iter()
        .filter_map(|m| match m {
            Message::System(s) if !s.trim().is_empty() => Some(s.as_str()),
            _ => None,
        })
        .collect();

    let mut turns: Vec<(&'static str, String)> = Vec::new();
    for m in messages {
        let (role, text) = match m {
            Message::System(_) => continue,
            Message::User(s) => ("user", s),
            Message::Assistant(s) => ("assistant", s),
        };
        if text.trim().is_empty() {
            continue;
        }
        match turns.last_mut() {
            Some((last_role, last_text)) if *last_role == role => {
                last_text.push_str("\n\n");
                last_text.push_str(text);
            }
            _ => turns.push((role, text.clone())),
        }
    }

    let mut body = json!({
        "model": model,
        "max_tokens": max_tokens,
        "messages": turns
            .into_iter()
            .map(|(role, text)| json!({ "role": role, "content": text }))
            .collect::<Vec<_>>(),
    });
    if let Some(obj) = body.as_object_mut() {
        if !system.is_empty() {
            obj.insert("system".to_string(), json!(system.join("\n\n")));
        }
        if !tools.is_empty() {
            let defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name,
                        "description": t.description.clone().unwrap_or_default(),
                        "input_schema": t.input_schema,
                    })
                })
                .collect();
            obj.insert("tools".to_string(), Value::Array(defs));
        }
    }
    body
}

/// Parses a Messages API response into text content and tool calls.
pub(crate) fn parse_response(value: &Value) -> Result<LlmResponse, AgentError> {
    let blocks = value
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| AgentError::ExecutionFailed("anthropic response has no content".into()))?;

    let mut text = Vec::new();
    let mut tool_calls = Vec::new();
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                if let Some(t) = block.get("text").and_then(Value::as_str) {
                    text.push(t);
                }
            }
            Some("tool_use") => tool_calls.push(ToolCall {
                name: block
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                arguments: block
                    .get("input")
                    .map(Value::to_string)
                    .unwrap_or_else(|| "{}".to_string()),
                id: block.get("id").and_then(Value::as_str).map(str::to_string),
            }),
            _ => {}
        }
    }

    let usage = value.get("usage").map(|u| {
        let prompt = u.get("input_tokens").and_then(Value::as_u64).unwrap_or(0) as u32;
        let completion = u.get("output_tokens").and_then(Value::as_u64).unwrap_or(0) as u32;
        LlmUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt + completion,
        }
    });

    Ok(LlmResponse {
        content: text.join("\n"),
        tool_calls,
        usage,
    })
}

#[async_trait]
impl LlmClient for ChatAnthropic {
    async fn invoke(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let body = build_request_body(&self.model, self.max_tokens, messages, tools);
        debug!(
            url = %self.messages_url(),
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "anthropic request"
        );
        let res = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("anthropic request: {}", e)))?;
        if !res.status().is_success() {
            let status = res.status();
            let err_body = res.text().await.unwrap_or_default();
            return Err(AgentError::ExecutionFailed(format!(
                "anthropic API error {}: {}",
                status, err_body
            )));
        }
        let value: Value = res
            .json()
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("anthropic response: {}", e)))?;
        trace!(response = %value, "anthropic response");
        parse_response(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_moves_system_out_and_merges_turns() {
        let messages = vec![
            Message::system("be careful"),
            Message::user("look up Smith"),
            Message::assistant(""),
            Message::user("Tool patient_lookup returned: none"),
            Message::assistant("No match."),
        ];
        let body = build_request_body("m", 512, &messages, &[]);
        assert_eq!(body["system"], "be careful");
        assert_eq!(body["max_tokens"], 512);
        let turns = body["messages"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(
            turns[0]["content"],
            "look up Smith\n\nTool patient_lookup returned: none"
        );
        assert_eq!(turns[1]["role"], "assistant");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn body_includes_tool_definitions() {
        let tools = vec![ToolSpec {
            name: "allergy_check".into(),
            description: Some("Check allergies".into()),
            input_schema: json!({"type": "object"}),
        }];
        let body = build_request_body("m", 1, &[Message::user("x")], &tools);
        assert_eq!(body["tools"][0]["name"], "allergy_check");
        assert_eq!(body["tools"][0]["description"], "Check allergies");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
    }

    #[test]
    fn parses_text_and_tool_use_blocks() {
        let value = json!({
            "content": [
                {"type": "text", "text": "Let me check."},
                {"type": "tool_use", "id": "tu_1", "name": "patient_lookup", "input": {"last_name": "Smith"}}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        });
        let r = parse_response(&value).unwrap();
        assert_eq!(r.content, "Let me check.");
        assert_eq!(r.tool_calls.len(), 1);
        assert_eq!(r.tool_calls[0].name, "patient_lookup");
        assert_eq!(r.tool_calls[0].id.as_deref(), Some("tu_1"));
        let args: Value = serde_json::from_str(&r.tool_calls[0].arguments).unwrap();
        assert_eq!(args["last_name"], "Smith");
        assert_eq!(r.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn missing_content_is_an_error() {
        assert!(parse_response(&json!({"type": "error"})).is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_execution_failure() {
        let llm = ChatAnthropic::new("key", DEFAULT_MODEL).with_base_url("http://127.0.0.1:1/");
        let err = llm.invoke(&[Message::user("hi")], &[]).await.unwrap_err();
        assert!(matches!(err, AgentError::ExecutionFailed(_)));
    }
}
