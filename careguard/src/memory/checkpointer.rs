//! Checkpointer trait and CheckpointError.

use async_trait::async_trait;

use crate::memory::checkpoint::{Checkpoint, CheckpointMetadata};
use crate::memory::config::RunnableConfig;

/// Error type for checkpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("thread_id required")]
    ThreadIdRequired,
}

/// Saves and loads the latest checkpoint by (thread_id, checkpoint_ns).
///
/// **Interaction**: Injected at compile via `StateGraph::compile_with_checkpointer`;
/// `CompiledStateGraph::invoke` uses it when `config.thread_id` is set.
#[async_trait]
pub trait Checkpointer<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Persist a checkpoint for the thread. Returns the checkpoint id used.
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError>;

    /// Load the latest checkpoint for the thread.
    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of CheckpointError names the missing thread id.
    #[test]
    fn checkpoint_error_display() {
        assert!(CheckpointError::ThreadIdRequired.to_string().contains("thread"));
    }
}
