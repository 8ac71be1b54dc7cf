//! Core board simulation - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules and session state machine.
//! It has **no dependencies** on terminal, rendering, or wall-clock time:
//!
//! - **Deterministic**: Same seed produces identical boards and refills
//! - **Synchronous**: Animation pauses are the driver's business; the core exposes
//!   discrete suspension points instead of sleeping
//! - **Observable**: Every change is queued as a [`BoardEvent`](types::BoardEvent)
//!
//! # Module Structure
//!
//! - [`grid`]: width x height tile grid with swap, collapse and refill helpers
//! - [`catalog`]: per-kind points and progress
//! - [`generation`]: seeded tile picker (match-avoiding initial fill, unbiased refill)
//! - [`matcher`]: run detection along rows and columns
//! - [`cascade`]: remove, collapse, refill, re-detect passes with a safety cap
//! - [`progress`]: clamped progress with an eased display value
//! - [`session`]: the `BoardSession` state machine
//! - [`config`]: session parameters, validation, environment overrides
//!
//! # Rules
//!
//! - A swap needs two orthogonally adjacent tiles and at least one move left
//! - The move is charged when the swap is performed and refunded if it produced
//!   no match (the swap is reverted)
//! - Every removed tile awards its kind's points and progress, including tiles
//!   removed by cascade passes
//! - After a cascade settles, reaching the completion threshold wins; otherwise
//!   an empty move budget loses
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{BoardSession, SessionConfig};
//! use tui_match3_core::types::{Phase, Pos};
//!
//! let mut session = BoardSession::new(SessionConfig::default(), 12345).unwrap();
//! assert_eq!(session.moves_remaining(), 10);
//!
//! session.select_tile(Pos::new(0, 0));
//! session.select_tile(Pos::new(1, 0));
//! assert_eq!(session.phase(), Phase::Swapping);
//!
//! // Without a driver, run every suspension point at once.
//! let phase = session.settle();
//! assert!(matches!(phase, Phase::Idle | Phase::Won | Phase::Lost));
//! ```

pub mod cascade;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generation;
pub mod grid;
pub mod matcher;
pub mod progress;
pub mod session;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use cascade::{CascadeResolver, CascadeStep};
pub use catalog::{TileCatalog, TileSpec};
pub use config::SessionConfig;
pub use error::{Error, Result};
pub use generation::GenerationPolicy;
pub use grid::Grid;
pub use matcher::{find_matches, find_runs, has_match, Axis, MatchSet, Run};
pub use progress::ProgressTracker;
pub use session::{BoardSession, SelectOutcome, SwapCheck};
pub use snapshot::GameSnapshot;
