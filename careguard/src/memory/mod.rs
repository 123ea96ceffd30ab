//! Per-thread conversation memory.
//!
//! A [`Checkpointer`] stores the graph state after each successful invoke, keyed by
//! `RunnableConfig::thread_id`. [`MemorySaver`] keeps everything in process memory.

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;

pub use checkpoint::{Checkpoint, CheckpointMetadata, CheckpointSource};
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use memory_saver::MemorySaver;
