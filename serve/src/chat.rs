//! `POST /chat`: one user turn.

use axum::{extract::State, Json};
use careguard::{new_thread_id, ChatRequest, ChatResponse};
use tracing::{debug, error};

use super::app::AppState;

/// Runs the turn; a session failure still answers 200 with a descriptive message.
pub(crate) async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let thread_id = request
        .thread_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(new_thread_id);
    debug!(thread_id = %thread_id, "chat request");

    match state
        .conversation
        .run_turn(Some(&thread_id), &request.message)
        .await
    {
        Ok(reply) => Json(reply.into()),
        Err(e) => {
            error!(thread_id = %thread_id, error = %e, "chat turn failed");
            Json(ChatResponse::from_error(thread_id, &e))
        }
    }
}
