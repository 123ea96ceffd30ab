//! ReAct: graph nodes (Think, Act, Observe) and the engine that wires them.
//!
//! The chain is think → act → observe → think, leaving through END when the model
//! answers without tool calls or after [`MAX_REACT_TURNS`] observe rounds.
//!
//! # Main types
//!
//! - **[`ThinkNode`]**: Calls the LLM with current messages and tool specs; may output tool calls.
//! - **[`ActNode`]**: Executes tool_calls against the `ToolRegistry` and fills tool_results.
//! - **[`ObserveNode`]**: Folds tool results into messages, clears tool_calls/tool_results.
//! - **[`ReactEngine`]**: A `ReasoningEngine` running the chain per request.

mod act_node;
mod engine;
mod observe_node;
mod think_node;

pub use act_node::{ActNode, DEFAULT_EXECUTION_ERROR_TEMPLATE};
pub use engine::ReactEngine;
pub use observe_node::{ObserveNode, MAX_REACT_TURNS};
pub use think_node::{ThinkNode, EMPTY_RESPONSE_FALLBACK};

use crate::state::ReActState;

/// Output of the tools_condition function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolsConditionResult {
    /// Route to the tools execution node ("tools").
    Tools,
    /// Route to the end node ("__end__").
    End,
}

impl ToolsConditionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::End => "__end__",
        }
    }
}

/// Conditional routing: if tool_calls present, route to act; else end.
pub fn tools_condition(state: &ReActState) -> ToolsConditionResult {
    if state.tool_calls.is_empty() {
        ToolsConditionResult::End
    } else {
        ToolsConditionResult::Tools
    }
}
