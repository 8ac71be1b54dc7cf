//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout frameworks and renders into a simple framebuffer
//! that is diffed and flushed to the terminal.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: snapshot to framebuffer (pure, testable), mouse hit-testing
//! - [`renderer`]: crossterm output with changed-run diffing

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{tile_color, AnchorY, BoardLayout, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, restore_terminal, TerminalRenderer};
