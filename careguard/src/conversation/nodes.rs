//! Conversation graph nodes: guard, reasoning, disclaimer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::agent::{ReasoningEngine, ReasoningRequest};
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::guard::{Category, Classifier, CLINICAL_DISCLAIMER};
use crate::message::Message;
use crate::tools::ToolRegistry;

use super::state::ConversationState;

/// Reply when the reasoning engine or one of its collaborators fails.
pub const REASONING_FAILURE_MESSAGE: &str =
    "I ran into a problem while processing your request. Please try again.";

/// Reply when the reasoning engine does not answer within the timeout.
pub const REASONING_TIMEOUT_MESSAGE: &str =
    "The request took too long to complete. Please try again.";

pub const DEFAULT_REASONING_TIMEOUT: Duration = Duration::from_secs(120);

/// Classifies the latest user turn and answers blocked requests directly.
pub struct GuardNode {
    classifier: Arc<Classifier>,
}

impl GuardNode {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Node<ConversationState> for GuardNode {
    fn id(&self) -> &str {
        "guard"
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        let verdict = self.classifier.apply(state.latest_user_text().unwrap_or(""));
        match &verdict.block_message {
            Some(message) => {
                tracing::info!(category = %verdict.category, "request blocked by scope guard");
                state.messages.push(Message::assistant(message.clone()));
            }
            None => tracing::debug!(category = %verdict.category, "request allowed"),
        }
        state.verdict = Some(verdict);
        Ok((state, Next::Continue))
    }
}

/// Calls the reasoning engine with the thread history, bounded by a timeout.
pub struct ReasoningNode {
    engine: Arc<dyn ReasoningEngine>,
    tools: Arc<ToolRegistry>,
    system_instructions: String,
    timeout: Duration,
}

impl ReasoningNode {
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        tools: Arc<ToolRegistry>,
        system_instructions: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            engine,
            tools,
            system_instructions: system_instructions.into(),
            timeout,
        }
    }

    async fn reply_turns(&self, history: Vec<Message>) -> Vec<Message> {
        let request = ReasoningRequest {
            system_instructions: self.system_instructions.clone(),
            tools: self.tools.clone(),
            history,
        };
        let result = tokio::time::timeout(self.timeout, self.engine.respond(request))
            .await
            .unwrap_or(Err(AgentError::Timeout(self.timeout)));
        let turns = match result {
            Ok(turns) => turns,
            Err(e) => {
                tracing::error!(error = %e, "reasoning engine failed");
                let text = match e {
                    AgentError::Timeout(_) => REASONING_TIMEOUT_MESSAGE,
                    AgentError::ExecutionFailed(_) => REASONING_FAILURE_MESSAGE,
                };
                return vec![Message::assistant(text)];
            }
        };

        let turns: Vec<Message> = turns
            .into_iter()
            .filter(|m| !matches!(m, Message::System(_)))
            .collect();
        if turns.last().map_or(true, |m| !m.is_assistant()) {
            tracing::error!("reasoning engine returned no assistant reply");
            return vec![Message::assistant(REASONING_FAILURE_MESSAGE)];
        }
        turns
    }
}

#[async_trait]
impl Node<ConversationState> for ReasoningNode {
    fn id(&self) -> &str {
        "reasoning"
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        let turns = self.reply_turns(state.messages.clone()).await;
        state.messages.extend(turns);
        Ok((state, Next::Continue))
    }
}

/// Appends the clinical disclaimer to clinical-support answers.
///
/// Classifies the latest user turn again rather than reading the stored verdict.
pub struct DisclaimerNode {
    classifier: Arc<Classifier>,
}

impl DisclaimerNode {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Node<ConversationState> for DisclaimerNode {
    fn id(&self) -> &str {
        "disclaimer"
    }

    async fn run(
        &self,
        mut state: ConversationState,
    ) -> Result<(ConversationState, Next), AgentError> {
        let category = self
            .classifier
            .category(state.latest_user_text().unwrap_or(""));
        if category == Category::ClinicalSupport {
            if let Some(Message::Assistant(text)) = state.messages.last_mut() {
                text.push_str(CLINICAL_DISCLAIMER);
            }
        }
        Ok((state, Next::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::guard::{DIAGNOSIS_MESSAGE, OUT_OF_SCOPE_MESSAGE};

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
        Nothing,
    }

    struct StubEngine {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl StubEngine {
        fn new(behavior: Behavior) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ReasoningEngine for StubEngine {
        async fn respond(&self, request: ReasoningRequest) -> Result<Vec<Message>, AgentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(request.history.last().map_or(false, |m| m.is_user()));
            match self.behavior {
                Behavior::Reply(text) => Ok(vec![Message::assistant(text)]),
                Behavior::Fail => Err(AgentError::ExecutionFailed("llm down".into())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(vec![])
                }
                Behavior::Nothing => Ok(vec![]),
            }
        }
    }

    fn reasoning(engine: Arc<StubEngine>, timeout: Duration) -> ReasoningNode {
        ReasoningNode::new(engine, Arc::new(ToolRegistry::new()), "sys", timeout)
    }

    fn user(text: &str) -> ConversationState {
        ConversationState::new(vec![Message::user(text)])
    }

    #[tokio::test]
    async fn guard_blocks_diagnosis_with_message() {
        let node = GuardNode::new(Arc::new(Classifier::default()));
        let (state, _) = node.run(user("Can you diagnose my rash?")).await.unwrap();
        let verdict = state.verdict.as_ref().unwrap();
        assert!(!verdict.allowed);
        assert_eq!(verdict.category, Category::DiagnosisRequest);
        assert_eq!(state.final_reply(), Some(DIAGNOSIS_MESSAGE));
    }

    #[tokio::test]
    async fn guard_allows_data_retrieval_without_reply() {
        let node = GuardNode::new(Arc::new(Classifier::default()));
        let (state, _) = node.run(user("Find patient John Smith")).await.unwrap();
        assert!(state.verdict.as_ref().unwrap().allowed);
        assert_eq!(state.messages.len(), 1);
    }

    #[tokio::test]
    async fn guard_blocks_out_of_scope() {
        let node = GuardNode::new(Arc::new(Classifier::default()));
        let (state, _) = node.run(user("What's the weather?")).await.unwrap();
        assert_eq!(state.final_reply(), Some(OUT_OF_SCOPE_MESSAGE));
    }

    #[tokio::test]
    async fn reasoning_appends_engine_reply() {
        let engine = StubEngine::new(Behavior::Reply("Found John Smith."));
        let node = reasoning(engine.clone(), Duration::from_secs(5));
        let (state, _) = node.run(user("find John Smith")).await.unwrap();
        assert_eq!(state.final_reply(), Some("Found John Smith."));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reasoning_failure_becomes_message() {
        let node = reasoning(StubEngine::new(Behavior::Fail), Duration::from_secs(5));
        let (state, _) = node.run(user("find John Smith")).await.unwrap();
        assert_eq!(state.final_reply(), Some(REASONING_FAILURE_MESSAGE));
        assert_eq!(state.messages.len(), 2);
    }

    #[tokio::test]
    async fn reasoning_without_reply_becomes_failure_message() {
        let node = reasoning(StubEngine::new(Behavior::Nothing), Duration::from_secs(5));
        let (state, _) = node.run(user("find John Smith")).await.unwrap();
        assert_eq!(state.final_reply(), Some(REASONING_FAILURE_MESSAGE));
    }

    #[tokio::test]
    async fn reasoning_timeout_becomes_message() {
        let node = reasoning(StubEngine::new(Behavior::Hang), Duration::from_millis(20));
        let (state, _) = node.run(user("find John Smith")).await.unwrap();
        assert_eq!(state.final_reply(), Some(REASONING_TIMEOUT_MESSAGE));
    }

    #[tokio::test]
    async fn disclaimer_only_for_clinical_support() {
        let node = DisclaimerNode::new(Arc::new(Classifier::default()));

        let mut state = user("Check drug interactions for warfarin and aspirin");
        state.messages.push(Message::assistant("Found 1 interaction."));
        let (state, _) = node.run(state).await.unwrap();
        let reply = state.final_reply().unwrap();
        assert!(reply.starts_with("Found 1 interaction."));
        assert!(reply.ends_with(CLINICAL_DISCLAIMER));

        let mut state = user("Find patient John Smith");
        state.messages.push(Message::assistant("Found 1 patient(s)."));
        let (state, _) = node.run(state).await.unwrap();
        assert_eq!(state.final_reply(), Some("Found 1 patient(s)."));
    }
}
