//! Invoke config: which thread a run belongs to.

/// Config for a single invoke. Identifies the thread and checkpoint namespace.
///
/// When using a checkpointer, invoke must provide at least `thread_id`.
#[derive(Debug, Clone, Default)]
pub struct RunnableConfig {
    /// Conversation id. Required when using a checkpointer.
    pub thread_id: Option<String>,
    /// Optional namespace for checkpoints. Default is empty.
    pub checkpoint_ns: String,
}

impl RunnableConfig {
    /// Config for the latest checkpoint of `thread_id`.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Default::default()
        }
    }
}
