//! TUI Match-3 (workspace facade crate).
//!
//! The implementation lives in dedicated crates under `crates/`; this package
//! re-exports them as `tui_match3::{core,engine,input,term,types}` and holds the
//! pieces shared by the binaries (logging setup, headless simulator).

pub mod logging;
pub mod sim;

pub use tui_match3_core as core;
pub use tui_match3_engine as engine;
pub use tui_match3_input as input;
pub use tui_match3_term as term;
pub use tui_match3_types as types;
