//! Shared pieces of the `careguard` binary: turn execution and output rendering.

use careguard::{new_thread_id, ChatResponse, Conversation};

/// Words that end the interactive loop.
const QUIT_COMMANDS: [&str; 3] = ["quit", "exit", "/quit"];

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// True for `quit`, `exit` or `/quit` (case-insensitive, surrounding space ignored).
pub fn is_quit_command(line: &str) -> bool {
    let line = line.trim();
    QUIT_COMMANDS.iter().any(|q| line.eq_ignore_ascii_case(q))
}

/// Runs one turn; a session failure becomes a descriptive reply on the same thread.
///
/// A missing or blank `thread_id` gets a fresh id before the turn runs, so every
/// reply names a thread the caller can continue.
pub async fn chat_once(
    conversation: &Conversation,
    thread_id: Option<&str>,
    message: &str,
) -> ChatResponse {
    let thread_id = thread_id
        .filter(|id| !id.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(new_thread_id);
    match conversation.run_turn(Some(&thread_id), message).await {
        Ok(reply) => reply.into(),
        Err(e) => {
            tracing::error!(thread_id = %thread_id, error = %e, "turn failed");
            ChatResponse::from_error(thread_id, &e)
        }
    }
}

/// Text printed for a reply: the JSON object with `json`, else the reply text.
pub fn render_reply(reply: &ChatResponse, json: bool) -> Result<String, OutputError> {
    if json {
        Ok(serde_json::to_string(reply)?)
    } else {
        Ok(reply.response.clone())
    }
}
