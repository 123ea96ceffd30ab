//! Library helpers of the CLI against an offline conversation.

use careguard::{ChatResponse, Settings, DIAGNOSIS_MESSAGE};
use cli::{chat_once, is_quit_command, render_reply};

#[test]
fn quit_commands() {
    for line in ["quit", " EXIT ", "/quit"] {
        assert!(is_quit_command(line), "{line}");
    }
    assert!(!is_quit_command("quit smoking advice"));
}

#[test]
fn render_plain_and_json() {
    let reply = ChatResponse {
        response: "hello".into(),
        thread_id: "t1".into(),
    };
    assert_eq!(render_reply(&reply, false).unwrap(), "hello");
    let json: serde_json::Value =
        serde_json::from_str(&render_reply(&reply, true).unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({"response": "hello", "thread_id": "t1"}));
}

/// **Scenario**: Mock mode still enforces the guard and keeps the thread id.
#[tokio::test]
async fn mock_conversation_blocks_diagnosis() {
    let conversation = Settings::default().conversation(true).unwrap();
    let reply = chat_once(&conversation, Some("cli-1"), "Diagnose this rash").await;
    assert_eq!(reply.response, DIAGNOSIS_MESSAGE);
    assert_eq!(reply.thread_id, "cli-1");
}

/// **Scenario**: Without a thread id the reply names a fresh thread that later turns continue.
#[tokio::test]
async fn missing_thread_id_gets_a_fresh_one() {
    let conversation = Settings::default().conversation(true).unwrap();
    let first = chat_once(&conversation, None, "Diagnose this rash").await;
    assert_eq!(first.thread_id.len(), 32);
    assert!(first.thread_id.chars().all(|c| c.is_ascii_hexdigit()));

    let blank = chat_once(&conversation, Some("  "), "Diagnose this rash").await;
    assert_eq!(blank.thread_id.len(), 32);
    assert_ne!(blank.thread_id, first.thread_id);

    chat_once(&conversation, Some(&first.thread_id), "Tell me a joke").await;
    let history = conversation.history(&first.thread_id).await.unwrap();
    assert_eq!(history.len(), 4);
}
