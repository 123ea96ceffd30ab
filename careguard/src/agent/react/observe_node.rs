//! Observe node: fold tool results into messages and decide whether to think again.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::message::Message;
use crate::state::ReActState;

/// Maximum observe rounds per reasoning call.
pub const MAX_REACT_TURNS: u32 = 10;

#[derive(Debug, Default)]
pub struct ObserveNode;

impl ObserveNode {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Node<ReActState> for ObserveNode {
    fn id(&self) -> &str {
        "observe"
    }

    async fn run(&self, state: ReActState) -> Result<(ReActState, Next), AgentError> {
        let had_tool_calls = !state.tool_calls.is_empty();
        let mut messages = state.messages;
        for tr in &state.tool_results {
            let name = tr
                .name
                .as_deref()
                .or(tr.call_id.as_deref())
                .unwrap_or("tool");
            messages.push(Message::User(format!(
                "Tool {} returned: {}",
                name, tr.content
            )));
        }
        let next_turn = state.turn_count.saturating_add(1);
        let new_state = ReActState {
            messages,
            tool_calls: vec![],
            tool_results: vec![],
            turn_count: next_turn,
        };
        let next = if next_turn >= MAX_REACT_TURNS {
            tracing::warn!(turns = next_turn, "react turn limit reached");
            Next::End
        } else if had_tool_calls {
            Next::Continue
        } else {
            Next::End
        };
        Ok((new_state, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ToolCall, ToolResult};

    fn with_one_result(turn_count: u32) -> ReActState {
        ReActState {
            messages: vec![Message::user("q")],
            tool_calls: vec![ToolCall {
                name: "allergy_check".into(),
                ..Default::default()
            }],
            tool_results: vec![ToolResult {
                name: Some("allergy_check".into()),
                content: "No documented allergies found for this patient.".into(),
                ..Default::default()
            }],
            turn_count,
        }
    }

    #[tokio::test]
    async fn observe_folds_results_and_continues() {
        let (state, next) = ObserveNode::new().run(with_one_result(0)).await.unwrap();
        assert!(matches!(next, Next::Continue));
        assert_eq!(state.turn_count, 1);
        assert!(state.tool_calls.is_empty() && state.tool_results.is_empty());
        assert_eq!(
            state.messages.last().map(|m| m.content()),
            Some("Tool allergy_check returned: No documented allergies found for this patient.")
        );
    }

    #[tokio::test]
    async fn observe_ends_at_turn_limit() {
        let (_, next) = ObserveNode::new()
            .run(with_one_result(MAX_REACT_TURNS - 1))
            .await
            .unwrap();
        assert!(matches!(next, Next::End));
    }
}
