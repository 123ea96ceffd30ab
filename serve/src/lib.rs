//! HTTP chat server for careguard (axum).
//!
//! Routes: `GET /health` and `POST /chat` (`ChatRequest` in, `ChatResponse` out).
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`router`].

mod app;
mod chat;

use std::sync::Arc;

use careguard::Conversation;
use tokio::net::TcpListener;
use tracing::info;

pub use app::router;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Serves on an existing listener. Used by tests (bind to 127.0.0.1:0 then pass listener).
pub async fn run_serve_on_listener(
    listener: TcpListener,
    conversation: Arc<Conversation>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("careguard server listening on http://{}", addr);
    axum::serve(listener, router(conversation)).await?;
    Ok(())
}

/// Binds `addr` (default 127.0.0.1:8000) and serves until the process exits.
pub async fn run_serve(
    addr: Option<&str>,
    conversation: Arc<Conversation>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr.unwrap_or(DEFAULT_ADDR)).await?;
    run_serve_on_listener(listener, conversation).await
}
