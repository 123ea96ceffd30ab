//! Reasoning side of the conversation: the engine contract, the ReAct engine and
//! the clinical assistant instructions.

mod prompt;
pub mod react;
mod reasoning;

pub use prompt::SYSTEM_PROMPT;
pub use react::ReactEngine;
pub use reasoning::{ReasoningEngine, ReasoningRequest};
