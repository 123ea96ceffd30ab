//! Axum app: shared state and router.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use careguard::Conversation;
use serde_json::{json, Value};

use super::chat::chat_handler;

/// Shared state: the process-wide conversation service.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) conversation: Arc<Conversation>,
}

/// Builds the router with `GET /health` and `POST /chat`.
pub fn router(conversation: Arc<Conversation>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat_handler))
        .with_state(AppState { conversation })
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
