//! Agent execution error types.
//!
//! Used by graph nodes, the reasoning engine, and LLM clients.

use thiserror::Error;

/// Agent execution error.
///
/// Returned by `Node::run` and `ReasoningEngine::respond` when a step fails.
/// The conversation graph converts these into an assistant message at the
/// reasoning boundary, so they never reach the user as a fault.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, tool error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A collaborator call did not finish in time (e.g. the reasoning timeout).
    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),
}
