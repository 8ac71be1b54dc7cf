//! Headless autoplay: the hint finder plays until the session ends.
//!
//! Every [`BoardEvent`](crate::types::BoardEvent) is written as one JSON line,
//! followed by a single summary line tagged `"type": "summary"`.

use std::io::Write;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::{BoardSession, SessionConfig};
use crate::engine::{apply_hint, Driver, DriverTiming, HintError};
use crate::types::Phase;

/// Turn limit when `--max-turns` is not given
pub const DEFAULT_MAX_TURNS: u32 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub seed: Option<u64>,
    pub max_turns: u32,
    pub session: SessionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_turns: DEFAULT_MAX_TURNS,
            session: SessionConfig::default(),
        }
    }
}

/// Parse `[--seed N] [--max-turns N]` (program name already stripped)
pub fn parse_sim_args(args: &[String]) -> Result<SimConfig> {
    let mut config = SimConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("match3-sim: missing value for --seed"))?;
                let seed = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("match3-sim: invalid --seed value: {}", v))?;
                config.seed = Some(seed);
            }
            "--max-turns" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("match3-sim: missing value for --max-turns"))?;
                config.max_turns = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("match3-sim: invalid --max-turns value: {}", v))?;
            }
            other => {
                return Err(anyhow!("match3-sim: unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(config)
}

/// Why the simulation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    Won,
    Lost,
    NoMatchingSwap,
    NotPlayable,
    TurnLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub seed: u64,
    pub turns: u32,
    pub score: u32,
    pub progress: f32,
    pub moves_remaining: u32,
    pub phase: Phase,
    pub stop: StopReason,
}

fn write_events(session: &mut BoardSession, out: &mut impl Write) -> Result<()> {
    for event in session.drain_events() {
        serde_json::to_writer(&mut *out, &event)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Play one session with `seed`, streaming events to `out`
pub fn run_sim(config: &SimConfig, seed: u64, out: &mut impl Write) -> Result<SimSummary> {
    let mut session = BoardSession::new(config.session, seed)?;
    let mut driver = Driver::new(DriverTiming::instant());
    write_events(&mut session, out)?;

    let mut turns = 0u32;
    let stop = loop {
        match session.phase() {
            Phase::Won => break StopReason::Won,
            Phase::Lost => break StopReason::Lost,
            Phase::Idle | Phase::Swapping | Phase::Resolving => {}
        }
        if turns >= config.max_turns {
            break StopReason::TurnLimit;
        }
        match apply_hint(&mut session) {
            Ok((a, b)) => debug!(turn = turns + 1, %a, %b, "playing hint"),
            Err(HintError::NoMatchingSwap) => {
                write_events(&mut session, out)?;
                break StopReason::NoMatchingSwap;
            }
            Err(HintError::NotPlayable) => {
                write_events(&mut session, out)?;
                break StopReason::NotPlayable;
            }
        }
        driver.run_until_idle(&mut session);
        turns += 1;
        write_events(&mut session, out)?;
    };

    let summary = SimSummary {
        kind: "summary",
        seed,
        turns,
        score: session.score(),
        progress: session.progress().current(),
        moves_remaining: session.moves_remaining(),
        phase: session.phase(),
        stop,
    };
    serde_json::to_writer(&mut *out, &summary)?;
    out.write_all(b"\n")?;
    out.flush()?;

    info!(
        seed,
        turns,
        score = summary.score,
        stop = ?summary.stop,
        "simulation finished"
    );
    Ok(summary)
}
