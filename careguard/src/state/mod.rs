//! State carried through the ReAct reasoning graph.
//!
//! [`ReActState`] flows through the think, act and observe nodes; the LLM writes
//! [`ToolCall`]s, act turns them into [`ToolResult`]s, observe folds results into
//! the message list.

mod react_state;

pub use react_state::{ReActState, ToolCall, ToolResult};
