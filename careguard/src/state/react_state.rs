use serde::{Deserialize, Serialize};

use crate::message::Message;

/// A single tool invocation produced by the LLM and consumed by the act node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name as registered in the `ToolRegistry`.
    pub name: String,
    /// Arguments as a JSON string; parsed by the act node.
    pub arguments: String,
    /// Provider id for the call, when the provider returns one.
    pub id: Option<String>,
}

/// Result of executing one tool call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub call_id: Option<String>,
    pub name: Option<String>,
    pub content: String,
    /// Set when the content is an error report rather than tool output.
    #[serde(default)]
    pub is_error: bool,
}

/// State for the ReAct graph: think → act → observe → think.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReActState {
    /// System instructions, conversation history and observed tool output.
    pub messages: Vec<Message>,
    /// Tool calls from the latest think step.
    pub tool_calls: Vec<ToolCall>,
    /// Results for `tool_calls`, written by act and cleared by observe.
    pub tool_results: Vec<ToolResult>,
    /// Number of observe rounds completed.
    #[serde(default)]
    pub turn_count: u32,
}

impl ReActState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Content of the chronologically last assistant message, if any.
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(s) => Some(s.clone()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_assistant_reply_picks_latest() {
        let state = ReActState::new(vec![
            Message::user("hi"),
            Message::assistant("first"),
            Message::user("Tool x returned: y"),
            Message::assistant("second"),
        ]);
        assert_eq!(state.last_assistant_reply().as_deref(), Some("second"));
        assert!(ReActState::default().last_assistant_reply().is_none());
    }
}
