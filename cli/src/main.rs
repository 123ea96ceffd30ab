//! careguard CLI binary: chat with the clinical records assistant, or serve it over HTTP.

mod logging;
mod repl;

use std::sync::Arc;

use careguard::Settings;
use clap::{Parser, Subcommand};
use cli::{chat_once, render_reply};

#[derive(Parser, Debug)]
#[command(name = "careguard")]
#[command(about = "careguard: scope-guarded clinical records assistant")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    /// User message (or pass as positional arguments)
    #[arg(short, long, value_name = "TEXT")]
    message: Option<String>,

    /// Positional args: user message when -m/--message is not used
    #[arg(trailing_var_arg = true)]
    rest: Vec<String>,

    /// Thread ID to continue a conversation
    #[arg(long, value_name = "ID")]
    thread_id: Option<String>,

    /// Verbose: log guard decisions, node enter/exit and tool calls
    #[arg(short, long)]
    verbose: bool,

    /// Interactive REPL (default when no message is given)
    #[arg(short, long)]
    interactive: bool,

    /// Use an offline mock model instead of the Anthropic API
    #[arg(long)]
    mock: bool,

    /// Print each reply as `{"response": ..., "thread_id": ...}`
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Run the HTTP chat server (GET /health, POST /chat)
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct ServeArgs {
    /// Listen address (default: SERVE_ADDR or 127.0.0.1:8000)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config_result = config::load_and_apply("careguard", None);
    logging::init(args.verbose)?;
    if let Err(e) = config_result {
        tracing::warn!(error = %e, "config not loaded");
    }

    let settings = Settings::from_env();
    let conversation = match settings.conversation(args.mock) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("careguard: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(Command::Serve(sa)) = &args.cmd {
        let addr = sa.addr.as_deref().unwrap_or(&settings.serve_addr);
        if let Err(e) = serve::run_serve(Some(addr), conversation).await {
            eprintln!("serve error: {}", e);
            std::process::exit(1);
        }
        return Ok(());
    }

    let message = args.message.or_else(|| {
        if args.rest.is_empty() {
            None
        } else {
            Some(args.rest.join(" "))
        }
    });

    match message {
        Some(msg) if !args.interactive => {
            let reply = chat_once(&conversation, args.thread_id.as_deref(), &msg).await;
            println!("{}", render_reply(&reply, args.json)?);
        }
        first => {
            let mut thread_id = args.thread_id;
            if let Some(msg) = first.filter(|m| !m.trim().is_empty()) {
                let reply = chat_once(&conversation, thread_id.as_deref(), &msg).await;
                thread_id = Some(reply.thread_id.clone());
                println!("{}", render_reply(&reply, args.json)?);
            }
            repl::run_repl_loop(&conversation, thread_id, args.json).await?;
        }
    }
    Ok(())
}
