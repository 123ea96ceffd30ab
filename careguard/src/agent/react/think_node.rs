//! Think node: read messages, call LLM, write assistant message and optional tool_calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::ReActState;
use crate::tool_source::ToolSpec;

/// Assistant text used when the model returns neither text nor tool calls.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "No text response from the model. Please try again or check the API.";

pub struct ThinkNode {
    llm: Arc<dyn LlmClient>,
    tools: Vec<ToolSpec>,
}

impl ThinkNode {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Vec<ToolSpec>) -> Self {
        Self { llm, tools }
    }
}

#[async_trait]
impl Node<ReActState> for ThinkNode {
    fn id(&self) -> &str {
        "think"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let response = self.llm.invoke(&state.messages, &self.tools).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "think usage"
            );
        }

        let content = if response.content.is_empty() && response.tool_calls.is_empty() {
            tracing::warn!("model returned no text and no tool calls");
            EMPTY_RESPONSE_FALLBACK.to_string()
        } else {
            response.content
        };

        let mut messages = state.messages;
        messages.push(Message::Assistant(content));
        let new_state = ReActState {
            messages,
            tool_calls: response.tool_calls,
            tool_results: state.tool_results,
            turn_count: state.turn_count,
        };
        Ok((new_state, Next::Continue))
    }
}
