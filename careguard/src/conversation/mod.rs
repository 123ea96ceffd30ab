//! Scope-guarded conversation: guard → reasoning → disclaimer over a per-thread store.
//!
//! # Main types
//!
//! - **[`Conversation`]**: Entry point. Runs one user turn on a thread and returns the reply.
//! - **[`ConversationState`]**: Thread history plus the verdict of the current turn.
//! - **[`GuardRoute`]** / [`guard_condition`]: Typed branch after the guard node.
//! - **[`ChatRequest`]** / **[`ChatResponse`]**: Wire types shared by the chat surfaces.

mod api;
mod error;
mod graph;
mod nodes;
mod route;
mod session;
mod state;

pub use api::{ChatRequest, ChatResponse};
pub use error::RunError;
pub use graph::build_conversation_graph;
pub use nodes::{
    DisclaimerNode, GuardNode, ReasoningNode, DEFAULT_REASONING_TIMEOUT, REASONING_FAILURE_MESSAGE,
    REASONING_TIMEOUT_MESSAGE,
};
pub use route::{guard_condition, GuardRoute};
pub use session::{new_thread_id, Conversation, ConversationBuilder, TurnReply};
pub use state::ConversationState;
