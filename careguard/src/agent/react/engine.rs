//! ReAct reasoning engine: builds the think/act/observe graph for each request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::reasoning::{ReasoningEngine, ReasoningRequest};
use crate::error::AgentError;
use crate::graph::{StateGraph, END, START};
use crate::llm::LlmClient;
use crate::message::Message;
use crate::state::ReActState;

use super::{tools_condition, ActNode, ObserveNode, ThinkNode};

/// Node budget for one reasoning call: three nodes per turn plus the final think.
const REACT_RECURSION_LIMIT: usize = 3 * super::MAX_REACT_TURNS as usize + 2;

/// [`ReasoningEngine`] backed by an [`LlmClient`] and the ReAct loop.
///
/// Only the final assistant turn is returned; tool traffic stays inside the run.
pub struct ReactEngine {
    llm: Arc<dyn LlmClient>,
}

impl ReactEngine {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    async fn run_graph(&self, request: ReasoningRequest) -> Result<ReActState, AgentError> {
        let mut graph = StateGraph::<ReActState>::new().with_recursion_limit(REACT_RECURSION_LIMIT);
        graph
            .add_node(
                "think",
                Arc::new(ThinkNode::new(self.llm.clone(), request.tools.list())),
            )
            .add_node("act", Arc::new(ActNode::new(request.tools.clone())))
            .add_node("observe", Arc::new(ObserveNode::new()))
            .add_edge(START, "think")
            .add_conditional_edges(
                "think",
                Arc::new(|s: &ReActState| tools_condition(s).as_str().to_string()),
                Some(HashMap::from([
                    ("tools".to_string(), "act".to_string()),
                    (END.to_string(), END.to_string()),
                ])),
            )
            .add_edge("act", "observe")
            .add_edge("observe", "think");
        let compiled = graph
            .compile()
            .map_err(|e| AgentError::ExecutionFailed(format!("react graph: {}", e)))?;

        let mut messages = Vec::with_capacity(request.history.len() + 1);
        messages.push(Message::System(request.system_instructions));
        messages.extend(request.history);
        compiled.invoke(ReActState::new(messages), None).await
    }
}

#[async_trait]
impl ReasoningEngine for ReactEngine {
    async fn respond(&self, request: ReasoningRequest) -> Result<Vec<Message>, AgentError> {
        let state = self.run_graph(request).await?;
        tracing::debug!(turns = state.turn_count, "react run finished");
        match state.messages.last() {
            Some(Message::Assistant(reply)) => Ok(vec![Message::Assistant(reply.clone())]),
            _ => Err(AgentError::ExecutionFailed(format!(
                "no final answer after {} tool rounds",
                state.turn_count
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmResponse, MockLlm};
    use crate::state::ToolCall;
    use crate::tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
    use crate::tools::{Tool, ToolRegistry};
    use serde_json::Value;

    struct FixedLookup;

    #[async_trait]
    impl Tool for FixedLookup {
        fn name(&self) -> &str {
            "patient_lookup"
        }
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: "patient_lookup".into(),
                description: Some("Search patients".into()),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }
        async fn call(&self, _args: Value) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent::text("Found 1 patient(s):\n\n- John Smith"))
        }
    }

    fn request(tools: ToolRegistry, text: &str) -> ReasoningRequest {
        ReasoningRequest {
            system_instructions: "be careful".into(),
            tools: Arc::new(tools),
            history: vec![Message::user(text)],
        }
    }

    fn lookup_call() -> ToolCall {
        ToolCall {
            name: "patient_lookup".into(),
            arguments: r#"{"last_name":"Smith"}"#.into(),
            id: Some("c1".into()),
        }
    }

    #[tokio::test]
    async fn direct_answer_returns_single_assistant_turn() {
        let llm = Arc::new(MockLlm::with_no_tool_calls("Hello."));
        let engine = ReactEngine::new(llm.clone());
        let out = engine
            .respond(request(ToolRegistry::new(), "hi"))
            .await
            .unwrap();
        assert_eq!(out, vec![Message::assistant("Hello.")]);
        assert_eq!(llm.call_count(), 1);
    }

    /// **Scenario**: A tool round happens before the final answer; only the answer is returned.
    #[tokio::test]
    async fn tool_round_then_answer() {
        let llm = Arc::new(MockLlm::first_tools_then_end(
            vec![lookup_call()],
            "John Smith was found.",
        ));
        let engine = ReactEngine::new(llm.clone());
        let tools = ToolRegistry::new().with(Box::new(FixedLookup));
        let out = engine.respond(request(tools, "find Smith")).await.unwrap();
        assert_eq!(out, vec![Message::assistant("John Smith was found.")]);
        assert_eq!(llm.call_count(), 2);
    }

    #[tokio::test]
    async fn endless_tool_calls_stop_at_turn_limit() {
        let llm = Arc::new(MockLlm::scripted(vec![LlmResponse::with_tool_calls(
            "",
            vec![lookup_call()],
        )]));
        let engine = ReactEngine::new(llm.clone());
        let tools = ToolRegistry::new().with(Box::new(FixedLookup));
        let err = engine.respond(request(tools, "loop")).await.unwrap_err();
        assert!(err.to_string().contains("no final answer"), "{}", err);
        assert_eq!(llm.call_count(), super::super::MAX_REACT_TURNS as usize);
    }
}
