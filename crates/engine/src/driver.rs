//! Tick-paced driver for the session's suspension points
//!
//! The core exposes `begin_swap`, `commit_swap_if_matched`, `revert_swap`,
//! `begin_cascade_step` and `cascade_complete` as synchronous calls. The driver
//! sequences them and inserts presentation delays between them:
//!
//! ```text
//! Idle --(swap queued)--> begin_swap --[SWAP_ANIM_MS]-->
//!     no match: --[REVERT_SETTLE_MS]--> revert_swap --[SWAP_ANIM_MS]--> Idle
//!     match:    commit, cascade pass --[FALL_ANIM_MS]--> ... --> cascade_complete --> Idle
//! ```
//!
//! Leftover time inside one tick carries into the next stage, so zero timings
//! finish a whole swap within a single tick.

use tracing::trace;

use crate::core::{BoardSession, SwapCheck};
use crate::types::{Phase, FALL_ANIM_MS, REVERT_SETTLE_MS, SWAP_ANIM_MS};

/// Presentation delays in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverTiming {
    /// Swap and revert animation
    pub swap_ms: u32,
    /// Pause before a non-matching swap is reverted
    pub revert_settle_ms: u32,
    /// Pause after each cascade pass
    pub fall_ms: u32,
}

impl DriverTiming {
    /// No delays at all (headless play, tests)
    pub const fn instant() -> Self {
        Self {
            swap_ms: 0,
            revert_settle_ms: 0,
            fall_ms: 0,
        }
    }
}

impl Default for DriverTiming {
    fn default() -> Self {
        Self {
            swap_ms: SWAP_ANIM_MS,
            revert_settle_ms: REVERT_SETTLE_MS,
            fall_ms: FALL_ANIM_MS,
        }
    }
}

/// What the driver is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverStage {
    #[default]
    Idle,
    /// Swap performed, animation running
    Swapping,
    /// No match; waiting before the revert
    Settling,
    /// Revert animation running
    Reverting,
    /// Cascade pass applied, fall animation running
    Falling,
}

#[derive(Debug, Clone, Default)]
pub struct Driver {
    timing: DriverTiming,
    stage: DriverStage,
    wait_ms: u32,
}

impl Driver {
    pub fn new(timing: DriverTiming) -> Self {
        Self {
            timing,
            stage: DriverStage::Idle,
            wait_ms: 0,
        }
    }

    pub fn timing(&self) -> DriverTiming {
        self.timing
    }

    pub fn stage(&self) -> DriverStage {
        self.stage
    }

    /// Time left in the current stage
    pub fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    pub fn is_busy(&self) -> bool {
        self.stage != DriverStage::Idle
    }

    /// Forget any in-flight stage (call after restarting the session)
    pub fn reset(&mut self) {
        self.stage = DriverStage::Idle;
        self.wait_ms = 0;
    }

    fn enter(&mut self, stage: DriverStage, wait_ms: u32) {
        trace!(?stage, wait_ms, "driver stage");
        self.stage = stage;
        self.wait_ms = wait_ms;
    }

    /// Advance the session by `elapsed_ms` of wall time
    ///
    /// Returns true if any suspension point was passed.
    pub fn tick(&mut self, session: &mut BoardSession, elapsed_ms: u32) -> bool {
        session.tick(elapsed_ms);

        let mut budget = elapsed_ms;
        let mut advanced = false;
        loop {
            if self.stage != DriverStage::Idle {
                if self.wait_ms > budget {
                    self.wait_ms -= budget;
                    break;
                }
                budget -= self.wait_ms;
                self.wait_ms = 0;
            }
            if !self.advance(session) {
                break;
            }
            advanced = true;
        }
        advanced
    }

    /// Run every pending stage without waiting
    ///
    /// Returns the phase the session ends in.
    pub fn run_until_idle(&mut self, session: &mut BoardSession) -> Phase {
        loop {
            self.wait_ms = 0;
            if !self.advance(session) {
                break;
            }
        }
        session.phase()
    }

    /// Leave the current stage; false when there is nothing to do
    fn advance(&mut self, session: &mut BoardSession) -> bool {
        match self.stage {
            DriverStage::Idle => match session.phase() {
                Phase::Swapping => {
                    if session.swap_check().is_none() && session.begin_swap().is_none() {
                        return false;
                    }
                    self.enter(DriverStage::Swapping, self.timing.swap_ms);
                    true
                }
                Phase::Resolving => {
                    self.enter(DriverStage::Falling, 0);
                    true
                }
                Phase::Idle | Phase::Won | Phase::Lost => false,
            },
            DriverStage::Swapping => {
                match session.swap_check() {
                    Some(SwapCheck::NoMatch) => {
                        self.enter(DriverStage::Settling, self.timing.revert_settle_ms);
                    }
                    Some(SwapCheck::Matched) => {
                        session.commit_swap_if_matched();
                        self.cascade_pass(session);
                    }
                    // Session was restarted under us.
                    None => self.enter(DriverStage::Idle, 0),
                }
                true
            }
            DriverStage::Settling => {
                if session.revert_swap() {
                    self.enter(DriverStage::Reverting, self.timing.swap_ms);
                } else {
                    self.enter(DriverStage::Idle, 0);
                }
                true
            }
            DriverStage::Reverting => {
                self.enter(DriverStage::Idle, 0);
                true
            }
            DriverStage::Falling => {
                if session.phase() == Phase::Resolving {
                    self.cascade_pass(session);
                } else {
                    self.enter(DriverStage::Idle, 0);
                }
                true
            }
        }
    }

    fn cascade_pass(&mut self, session: &mut BoardSession) {
        if session.begin_cascade_step().is_some() {
            self.enter(DriverStage::Falling, self.timing.fall_ms);
        } else {
            session.cascade_complete();
            self.enter(DriverStage::Idle, 0);
        }
    }
}
