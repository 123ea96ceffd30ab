//! Compiled state graph: immutable, supports invoke.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. Holds nodes, the
//! per-node routing table, and an optional checkpointer. When a checkpointer is set
//! and `config.thread_id` is provided, the final state is saved after a successful
//! invoke; a failed run saves nothing.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;
use crate::memory::{Checkpoint, CheckpointError, CheckpointSource, Checkpointer, RunnableConfig};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
};
use super::state_graph::END;
use super::{Next, NextEntry, Node};

/// Default maximum number of node executions per invoke.
pub const DEFAULT_RECURSION_LIMIT: usize = 64;

/// Compiled graph: immutable structure, supports invoke only.
///
/// Runs from the node after START; after each node, a conditional router (when
/// present) or the node's `Next` plus its outgoing edge chooses the next node.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    pub(super) recursion_limit: usize,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn resolve_next(&self, node_id: &str, state: &S, next: Next) -> String {
        match self.next_map.get(node_id) {
            Some(NextEntry::Conditional(router)) => router.resolve_next(state),
            Some(NextEntry::Unconditional(to)) => match next {
                Next::Continue => to.clone(),
                Next::Node(id) => id,
                Next::End => END.to_string(),
            },
            None => match next {
                Next::Node(id) => id,
                Next::Continue | Next::End => END.to_string(),
            },
        }
    }

    /// Runs the graph from its first node until END and returns the final state.
    ///
    /// When the graph was compiled with a checkpointer and `config.thread_id` is set,
    /// the final state is stored as a new checkpoint for that thread.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        log_graph_start();
        let result = self.run_loop(state).await;
        let (state, steps) = match result {
            Ok((state, steps)) => {
                log_graph_complete(steps);
                (state, steps)
            }
            Err(e) => {
                log_graph_error(&e);
                return Err(e);
            }
        };

        if let (Some(cp), Some(cfg)) = (&self.checkpointer, config.as_ref()) {
            if cfg.thread_id.is_some() {
                let checkpoint =
                    Checkpoint::from_state(state.clone(), CheckpointSource::Loop, steps as i64);
                cp.put(cfg, &checkpoint)
                    .await
                    .map_err(|e| AgentError::ExecutionFailed(format!("checkpoint: {}", e)))?;
            }
        }
        Ok(state)
    }

    async fn run_loop(&self, mut state: S) -> Result<(S, usize), AgentError> {
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;
        loop {
            if steps >= self.recursion_limit {
                return Err(AgentError::ExecutionFailed(format!(
                    "recursion limit of {} reached",
                    self.recursion_limit
                )));
            }
            let node = self
                .nodes
                .get(&current_id)
                .cloned()
                .ok_or_else(|| AgentError::ExecutionFailed(format!("unknown node: {}", current_id)))?;

            log_node_start(&current_id);
            let (new_state, next) = node.run(state).await?;
            log_node_complete(&current_id, &next);
            steps += 1;
            state = new_state;

            let next_id = self.resolve_next(&current_id, &state, next);
            if next_id == END {
                return Ok((state, steps));
            }
            current_id = next_id;
        }
    }

    /// Latest checkpointed state for `config.thread_id`, if any.
    ///
    /// Returns `Ok(None)` when the graph has no checkpointer or the thread is unknown.
    pub async fn get_state(&self, config: &RunnableConfig) -> Result<Option<S>, CheckpointError> {
        let Some(cp) = &self.checkpointer else {
            return Ok(None);
        };
        Ok(cp
            .get_tuple(config)
            .await?
            .map(|(checkpoint, _)| checkpoint.channel_values))
    }
}
