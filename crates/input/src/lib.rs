//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key and mouse events into [`crate::types::GameAction`] and keeps
//! the board cursor that keyboard play moves around.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, left_click, should_quit};
