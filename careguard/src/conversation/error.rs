use crate::error::AgentError;
use crate::graph::CompilationError;
use crate::memory::CheckpointError;

/// Failure of a whole turn at the session boundary.
///
/// Collaborator failures never surface here; they are answered inside the graph.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
    #[error("turn finished without an assistant reply")]
    MissingReply,
}
