//! Logging helpers for graph execution.

use crate::error::AgentError;

use super::Next;

pub fn log_node_start(node_id: &str) {
    tracing::debug!(node_id = node_id, "Starting node execution");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    tracing::debug!(node_id = node_id, ?next, "Node execution complete");
}

pub fn log_graph_start() {
    tracing::info!("Starting graph execution");
}

pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

pub fn log_graph_error(error: &AgentError) {
    tracing::error!(?error, "Graph execution error");
}
