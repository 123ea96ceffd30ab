//! Thread-keyed conversation sessions over the checkpointed graph.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::agent::{ReasoningEngine, SYSTEM_PROMPT};
use crate::graph::{CompilationError, CompiledStateGraph};
use crate::guard::Classifier;
use crate::memory::{MemorySaver, RunnableConfig};
use crate::message::Message;
use crate::tools::ToolRegistry;

use super::error::RunError;
use super::graph::build_conversation_graph;
use super::nodes::DEFAULT_REASONING_TIMEOUT;
use super::state::ConversationState;

/// Fresh thread id: a UUID v4 in 32-char simple form.
pub fn new_thread_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Reply to one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReply {
    pub response: String,
    pub thread_id: String,
}

/// Builder for [`Conversation`]; defaults to the built-in keyword tables, the
/// clinical assistant instructions and a 120 s reasoning timeout.
pub struct ConversationBuilder {
    engine: Arc<dyn ReasoningEngine>,
    tools: Arc<ToolRegistry>,
    classifier: Classifier,
    system_instructions: String,
    reasoning_timeout: Duration,
}

impl ConversationBuilder {
    pub fn classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn system_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.system_instructions = instructions.into();
        self
    }

    pub fn reasoning_timeout(mut self, timeout: Duration) -> Self {
        self.reasoning_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Conversation, CompilationError> {
        let graph = build_conversation_graph(
            Arc::new(self.classifier),
            self.engine,
            self.tools,
            &self.system_instructions,
            self.reasoning_timeout,
            Arc::new(MemorySaver::<ConversationState>::new()),
        )?;
        Ok(Conversation {
            graph,
            thread_locks: DashMap::new(),
        })
    }
}

/// Process-wide conversation service.
///
/// Threads are created on first use and live as long as the `Conversation`.
/// Turns on the same thread are queued; different threads run in parallel.
pub struct Conversation {
    graph: CompiledStateGraph<ConversationState>,
    thread_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Conversation {
    /// Conversation with default settings.
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        tools: Arc<ToolRegistry>,
    ) -> Result<Self, CompilationError> {
        Self::builder(engine, tools).build()
    }

    pub fn builder(engine: Arc<dyn ReasoningEngine>, tools: Arc<ToolRegistry>) -> ConversationBuilder {
        ConversationBuilder {
            engine,
            tools,
            classifier: Classifier::default(),
            system_instructions: SYSTEM_PROMPT.to_string(),
            reasoning_timeout: DEFAULT_REASONING_TIMEOUT,
        }
    }

    /// Runs one user turn on `thread_id`, or on a fresh thread when `None`.
    ///
    /// The thread's history is only updated when the whole turn completes.
    pub async fn run_turn(
        &self,
        thread_id: Option<&str>,
        user_text: &str,
    ) -> Result<TurnReply, RunError> {
        let thread_id = match thread_id {
            Some(id) => id.to_string(),
            None => new_thread_id(),
        };
        let lock = self.thread_locks.entry(thread_id.clone()).or_default().clone();
        let _turn = lock.lock().await;

        let config = RunnableConfig::for_thread(thread_id.clone());
        let mut state = self.graph.get_state(&config).await?.unwrap_or_default();
        state.messages.push(Message::user(user_text));
        state.verdict = None;

        tracing::info!(thread_id = %thread_id, "running turn");
        let state = self.graph.invoke(state, Some(config)).await?;
        let response = state.final_reply().ok_or(RunError::MissingReply)?.to_string();
        Ok(TurnReply {
            response,
            thread_id,
        })
    }

    /// Stored turns of `thread_id`; empty for unknown threads.
    pub async fn history(&self, thread_id: &str) -> Result<Vec<Message>, RunError> {
        let config = RunnableConfig::for_thread(thread_id);
        Ok(self
            .graph
            .get_state(&config)
            .await?
            .map(|s| s.messages)
            .unwrap_or_default())
    }
}
