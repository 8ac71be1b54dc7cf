//! Headless autoplay runner.
//!
//! Usage: `match3-sim [--seed N] [--max-turns N]`
//!
//! Stdout carries one JSON object per line (board events, then a summary);
//! logs go to stderr. Board parameters come from the `MATCH3_*` environment
//! variables.

use std::io;

use anyhow::Result;

use tui_match3::core::SessionConfig;
use tui_match3::logging::{init_stderr_logging, seed_from_env};
use tui_match3::sim::{parse_sim_args, run_sim};

fn main() -> Result<()> {
    init_stderr_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = parse_sim_args(&args)?;
    config.session = SessionConfig::from_env();
    let seed = config.seed.unwrap_or_else(seed_from_env);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_sim(&config, seed, &mut out)?;
    Ok(())
}
