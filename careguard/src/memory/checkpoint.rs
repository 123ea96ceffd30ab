//! Checkpoint and metadata types.

use std::time::SystemTime;

/// Source of the checkpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckpointSource {
    /// Created from the input to invoke.
    #[default]
    Input,
    /// Created at the end of a graph run.
    Loop,
}

/// Metadata for a single checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    /// Number of node executions in the run that produced this checkpoint.
    pub step: i64,
    pub created_at: Option<SystemTime>,
}

/// Snapshot of graph state for one thread.
#[derive(Debug, Clone)]
pub struct Checkpoint<S> {
    /// Unique id (UUID v4).
    pub id: String,
    /// Milliseconds since the Unix epoch, as a string.
    pub ts: String,
    /// The graph state at the time of the checkpoint.
    pub channel_values: S,
    pub metadata: CheckpointMetadata,
}

impl<S> Checkpoint<S> {
    /// Creates a checkpoint from current state for saving after invoke.
    pub fn from_state(state: S, source: CheckpointSource, step: i64) -> Self {
        let now = SystemTime::now();
        let ts = now
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
            .to_string();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            ts,
            channel_values: state,
            metadata: CheckpointMetadata {
                source,
                step,
                created_at: Some(now),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Multiple checkpoints have unique IDs.
    #[test]
    fn checkpoint_unique_ids() {
        let cp1: Checkpoint<i32> = Checkpoint::from_state(1, CheckpointSource::Input, -1);
        let cp2: Checkpoint<i32> = Checkpoint::from_state(2, CheckpointSource::Loop, 0);
        assert_ne!(cp1.id, cp2.id);
    }

    #[test]
    fn from_state_fills_metadata() {
        let cp = Checkpoint::from_state("s".to_string(), CheckpointSource::Loop, 3);
        assert_eq!(cp.channel_values, "s");
        assert_eq!(cp.metadata.source, CheckpointSource::Loop);
        assert_eq!(cp.metadata.step, 3);
        assert!(cp.metadata.created_at.is_some());
        assert!(cp.ts.parse::<u128>().is_ok());
    }
}
