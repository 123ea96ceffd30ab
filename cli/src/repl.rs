//! Interactive REPL loop: read stdin, run a turn, print the reply, repeat until EOF or quit.
//!
//! The thread id is fixed after the first reply so every turn shares one history.

use std::io::Write;

use careguard::Conversation;
use tokio::io::{AsyncBufReadExt, BufReader};

use cli::{chat_once, is_quit_command, render_reply};

/// Exits on EOF (Ctrl+D) or `quit`/`exit`/`/quit`; blank lines are ignored.
pub async fn run_repl_loop(
    conversation: &Conversation,
    mut thread_id: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match reader.next_line().await? {
            None => break,
            Some(s) if s.trim().is_empty() => continue,
            Some(s) if is_quit_command(&s) => break,
            Some(s) => s,
        };

        let reply = chat_once(conversation, thread_id.as_deref(), &line).await;
        if !reply.thread_id.is_empty() {
            thread_id = Some(reply.thread_id.clone());
        }
        println!("{}", render_reply(&reply, json)?);
    }
    Ok(())
}
