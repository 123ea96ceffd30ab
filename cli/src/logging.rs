//! Tracing setup for the binary: `RUST_LOG` when set, else `warn` (`debug` with `--verbose`).
//! Logs go to stderr so stdout carries only replies.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let default = if verbose { "careguard=debug,info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .try_init()?;
    Ok(())
}
