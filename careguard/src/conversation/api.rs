use serde::{Deserialize, Serialize};

use super::error::RunError;
use super::session::TurnReply;

/// Chat request: the user's message and an optional thread to continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Chat response: the assistant reply and the thread it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub thread_id: String,
}

impl From<TurnReply> for ChatResponse {
    fn from(reply: TurnReply) -> Self {
        Self {
            response: reply.response,
            thread_id: reply.thread_id,
        }
    }
}

impl ChatResponse {
    /// Single descriptive reply for a turn that failed at the session boundary.
    pub fn from_error(thread_id: impl Into<String>, error: &RunError) -> Self {
        Self {
            response: format!(
                "Sorry, I couldn't complete that request ({}). Please try again.",
                error
            ),
            thread_id: thread_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_thread_id_is_optional() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req.thread_id, None);
        let req: ChatRequest =
            serde_json::from_str(r#"{"message":"hi","thread_id":"t1"}"#).unwrap();
        assert_eq!(req.thread_id.as_deref(), Some("t1"));
    }

    #[test]
    fn error_reply_names_the_failure() {
        let reply = ChatResponse::from_error("t1", &RunError::MissingReply);
        assert_eq!(reply.thread_id, "t1");
        assert!(reply
            .response
            .contains("turn finished without an assistant reply"));
    }
}
