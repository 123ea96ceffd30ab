use serde::{Deserialize, Serialize};

use crate::guard::GuardVerdict;
use crate::message::Message;

/// State carried through the conversation graph and checkpointed per thread.
///
/// `messages` holds only user and assistant turns, in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    /// Guard verdict for the latest user turn; `None` before the guard runs.
    #[serde(default)]
    pub verdict: Option<GuardVerdict>,
}

impl ConversationState {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            verdict: None,
        }
    }

    /// Text of the most recent user turn.
    pub fn latest_user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content())
    }

    /// Text of the final turn when it is an assistant turn.
    pub fn final_reply(&self) -> Option<&str> {
        match self.messages.last() {
            Some(Message::Assistant(text)) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_user_and_final_reply() {
        let state = ConversationState::new(vec![
            Message::user("one"),
            Message::assistant("a"),
            Message::user("two"),
        ]);
        assert_eq!(state.latest_user_text(), Some("two"));
        assert_eq!(state.final_reply(), None);
        assert_eq!(ConversationState::default().latest_user_text(), None);
    }
}
