//! Mock LLM for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::tool_source::ToolSpec;

/// Mock LLM returning a fixed response or a script of responses.
///
/// With a script, call `n` returns entry `n`; once the script is exhausted the last
/// entry is repeated. Every call is counted.
pub struct MockLlm {
    script: Vec<LlmResponse>,
    calls: AtomicUsize,
}

impl MockLlm {
    /// Always answers `content` with no tool calls.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::scripted(vec![LlmResponse::text(content)])
    }

    /// Answers the given responses in order.
    pub fn scripted(script: Vec<LlmResponse>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// First call requests `tool_calls`, every later call answers `final_content`.
    pub fn first_tools_then_end(
        tool_calls: Vec<crate::state::ToolCall>,
        final_content: impl Into<String>,
    ) -> Self {
        Self::scripted(vec![
            LlmResponse::with_tool_calls("", tool_calls),
            LlmResponse::text(final_content),
        ])
    }

    /// Number of `invoke` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .get(n)
            .or_else(|| self.script.last())
            .cloned()
            .ok_or_else(|| AgentError::ExecutionFailed("mock llm has no responses".into()))
    }
}
