//! Engine helpers built on top of the core session.
//!
//! - [`driver`]: sequences the session's suspension points with presentation delays
//! - [`hint`]: finds an adjacent swap that produces a match

pub mod driver;
pub mod hint;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use driver::{Driver, DriverStage, DriverTiming};
pub use hint::{apply_hint, find_matching_swap, HintError};
