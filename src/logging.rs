//! Tracing subscriber setup for the binaries.
//!
//! The filter comes from `RUST_LOG` and defaults to `info`.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Default log file for the interactive binary
pub const DEFAULT_LOG_PATH: &str = "tui-match3.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to a file so output never lands on the game screen.
///
/// The path comes from `MATCH3_LOG_PATH`, falling back to [`DEFAULT_LOG_PATH`].
pub fn init_file_logging() -> Result<()> {
    let path = std::env::var("MATCH3_LOG_PATH").unwrap_or_else(|_| DEFAULT_LOG_PATH.to_string());
    let log_file = std::fs::File::create(&path)?;
    // Don't fail if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Log to stderr, keeping stdout free for machine-readable output.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Seed from `MATCH3_SEED`, or a random one.
pub fn seed_from_env() -> u64 {
    std::env::var("MATCH3_SEED")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(rand::random)
}
