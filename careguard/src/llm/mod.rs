//! LLM client abstraction for the ReAct think node.
//!
//! The think node depends on a callable that returns assistant text and optional
//! tool calls; this module defines the trait, a mock implementation and the
//! Anthropic Messages API client.

mod anthropic;
mod mock;

pub use anthropic::{ChatAnthropic, DEFAULT_ANTHROPIC_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use mock::MockLlm;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// Token usage for one LLM call.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from an LLM completion: assistant text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; the think node writes
/// `content` into a new assistant message and `tool_calls` into `ReActState::tool_calls`.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    /// Assistant message content (plain text).
    pub content: String,
    /// Tool calls from this turn; empty means the model is done.
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    /// Final answer without tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Turn that asks for tools.
    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            usage: None,
        }
    }
}

/// LLM client: given messages and the available tools, returns assistant text and
/// optional tool calls.
///
/// `messages` may start with `Message::System` entries carrying instructions.
/// Implementations: `MockLlm` (fixed or scripted responses), `ChatAnthropic` (real API).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, messages: &[Message], tools: &[ToolSpec])
        -> Result<LlmResponse, AgentError>;
}
