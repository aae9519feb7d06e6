//! Tracing setup for the binaries.
//!
//! Logs always go to stderr: the provider's stdout carries the MCP protocol
//! and the client's stdout carries the conversation.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
