use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;
use crate::tools::ToolRegistry;

/// Input for one reasoning call.
#[derive(Clone)]
pub struct ReasoningRequest {
    /// Instructions sent ahead of the history.
    pub system_instructions: String,
    /// Tools the engine may call.
    pub tools: Arc<ToolRegistry>,
    /// Thread history, oldest first; the last entry is the current user turn.
    pub history: Vec<Message>,
}

impl std::fmt::Debug for ReasoningRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningRequest")
            .field("system_instructions_len", &self.system_instructions.len())
            .field("tools", &self.tools.len())
            .field("history", &self.history)
            .finish()
    }
}

/// Produces the assistant's answer for an allowed request.
///
/// Returns the turns to append to the thread; the last one is the assistant reply.
///
/// **Interaction**: Called by the conversation graph's reasoning node, which bounds
/// the call with a timeout and turns errors into a single assistant message.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    async fn respond(&self, request: ReasoningRequest) -> Result<Vec<Message>, AgentError>;
}
