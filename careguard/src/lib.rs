//! # Careguard
//!
//! Scope-guarded conversational middleware for clinical records lookups. Every user
//! turn passes a deterministic keyword guard before any reasoning happens: requests
//! for diagnoses or treatments, and anything outside the records domain, are answered
//! with a fixed message and never reach the model or the tools.
//!
//! ## Flow
//!
//! `guard` → (`reasoning` → `disclaimer` | END), run as a [`StateGraph`] over
//! [`ConversationState`] and checkpointed per thread id. Clinical-support answers
//! always end with [`CLINICAL_DISCLAIMER`].
//!
//! ## Main modules
//!
//! - [`guard`]: [`Classifier`], [`Category`], [`GuardVerdict`], [`apply_guard`] and the fixed replies.
//! - [`conversation`]: [`Conversation`] (thread store + `run_turn`), graph nodes, [`ChatRequest`] / [`ChatResponse`].
//! - [`agent`]: [`ReasoningEngine`] and the ReAct implementation [`ReactEngine`] (think → act → observe).
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`].
//! - [`memory`]: [`Checkpointer`], [`MemorySaver`], [`RunnableConfig`].
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], [`ChatAnthropic`].
//! - [`tools`]: [`Tool`], [`ToolRegistry`], patient lookup, allergy check, drug interaction check.
//! - [`records`]: OpenEMR client with OAuth2 ([`RecordsClient`]).
//! - [`settings`]: [`Settings`] read from the environment.
//! - [`state`]: [`ReActState`], [`ToolCall`], [`ToolResult`].
//! - [`message`]: [`Message`] (System / User / Assistant).

pub mod agent;
pub mod conversation;
pub mod error;
pub mod graph;
pub mod guard;
pub mod llm;
pub mod memory;
pub mod message;
pub mod records;
pub mod settings;
pub mod state;
pub mod tool_source;
pub mod tools;

pub use agent::react::{tools_condition, ActNode, ObserveNode, ThinkNode, ToolsConditionResult};
pub use agent::{ReactEngine, ReasoningEngine, ReasoningRequest, SYSTEM_PROMPT};
pub use conversation::{
    guard_condition, new_thread_id, ChatRequest, ChatResponse, Conversation, ConversationState,
    GuardRoute,
    RunError, TurnReply,
};
pub use error::AgentError;
pub use graph::{CompilationError, CompiledStateGraph, Next, Node, StateGraph, END, START};
pub use guard::{
    apply_guard, Category, Classifier, ClassifierError, GuardKeywords, GuardVerdict,
    CLINICAL_DISCLAIMER, DIAGNOSIS_MESSAGE, OUT_OF_SCOPE_MESSAGE, TREATMENT_MESSAGE,
};
pub use llm::{ChatAnthropic, LlmClient, LlmResponse, MockLlm};
pub use memory::{Checkpointer, MemorySaver, RunnableConfig};
pub use message::Message;
pub use records::{RecordsApi, RecordsClient, RecordsConfig, RecordsError};
pub use settings::{Settings, SettingsError};
pub use state::{ReActState, ToolCall, ToolResult};
pub use tool_source::{ToolCallContent, ToolSourceError, ToolSpec};
pub use tools::{clinical_tools, Tool, ToolRegistry};
