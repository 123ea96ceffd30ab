//! Wiring of the conversation graph.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::agent::ReasoningEngine;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::guard::Classifier;
use crate::memory::Checkpointer;
use crate::tools::ToolRegistry;

use super::nodes::{DisclaimerNode, GuardNode, ReasoningNode};
use super::route::{guard_condition, GuardRoute};
use super::state::ConversationState;

/// Builds START → guard → (reasoning → disclaimer | END) → END, compiled with `checkpointer`.
pub fn build_conversation_graph(
    classifier: Arc<Classifier>,
    engine: Arc<dyn ReasoningEngine>,
    tools: Arc<ToolRegistry>,
    system_instructions: &str,
    reasoning_timeout: Duration,
    checkpointer: Arc<dyn Checkpointer<ConversationState>>,
) -> Result<CompiledStateGraph<ConversationState>, CompilationError> {
    let mut graph = StateGraph::<ConversationState>::new();
    graph
        .add_node("guard", Arc::new(GuardNode::new(classifier.clone())))
        .add_node(
            "reasoning",
            Arc::new(ReasoningNode::new(
                engine,
                tools,
                system_instructions,
                reasoning_timeout,
            )),
        )
        .add_node("disclaimer", Arc::new(DisclaimerNode::new(classifier)))
        .add_edge(START, "guard")
        .add_conditional_edges(
            "guard",
            Arc::new(|s: &ConversationState| guard_condition(s).as_str().to_string()),
            Some(HashMap::from([
                (GuardRoute::Reason.as_str().to_string(), "reasoning".to_string()),
                (GuardRoute::End.as_str().to_string(), END.to_string()),
            ])),
        )
        .add_edge("reasoning", "disclaimer")
        .add_edge("disclaimer", END);
    graph.compile_with_checkpointer(checkpointer)
}
