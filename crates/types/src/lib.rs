//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are plain data with no behaviour beyond small helpers, making them
//! usable in any context (core simulation, terminal rendering, headless drivers).
//!
//! # Coordinates
//!
//! Cells are addressed by [`Pos`] `(x, y)`:
//!
//! - **x**: column, `0` is the leftmost column
//! - **y**: row, `0` is the **bottom** row; gravity pulls tiles toward `y = 0`
//!   and refills enter from the top (`y = height - 1`)
//!
//! # Session Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 7 | Grid columns |
//! | `DEFAULT_HEIGHT` | 7 | Grid rows |
//! | `DEFAULT_TILE_TYPES` | 6 | Number of distinct tile kinds |
//! | `DEFAULT_MOVES` | 10 | Move budget per session |
//! | `DEFAULT_COMPLETION_THRESHOLD` | 100.0 | Progress needed to win |
//!
//! # Presentation Timing
//!
//! Timing values are in milliseconds and only used by drivers, never by the core:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `SWAP_ANIM_MS` | 300 | Swap (and revert) animation |
//! | `REVERT_SETTLE_MS` | 200 | Pause before a non-matching swap is reverted |
//! | `FALL_ANIM_MS` | 500 | Collapse/refill animation per cascade pass |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{GameAction, Phase, Pos, TileKind};
//!
//! let a = Pos::new(2, 3);
//! assert!(a.is_adjacent(Pos::new(2, 4)));
//! assert!(!a.is_adjacent(Pos::new(3, 4)));
//!
//! assert_eq!(TileKind::new(0).letter(), 'A');
//! assert_eq!(GameAction::from_str("select"), Some(GameAction::Select));
//! assert!(Phase::Won.is_terminal());
//! ```

use serde::{Deserialize, Serialize};

/// Default grid width (7 columns)
pub const DEFAULT_WIDTH: u8 = 7;

/// Default grid height (7 rows)
pub const DEFAULT_HEIGHT: u8 = 7;

/// Default number of tile kinds
pub const DEFAULT_TILE_TYPES: u8 = 6;

/// Default move budget
pub const DEFAULT_MOVES: u32 = 10;

/// Default progress needed to win
pub const DEFAULT_COMPLETION_THRESHOLD: f32 = 100.0;

/// Upper clamp for authoritative progress
pub const PROGRESS_MAX: f32 = 100.0;

/// Smallest grid dimension that can hold a run
pub const MIN_GRID_DIM: u8 = 3;

/// Largest accepted grid dimension
pub const MAX_GRID_DIM: u8 = 64;

/// Fewest tile kinds accepted by configuration
pub const MIN_TILE_TYPES: u8 = 3;

/// Most tile kinds accepted by configuration
pub const MAX_TILE_TYPES: u8 = 32;

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Cascade safety cap is `CASCADE_CAP_FACTOR * width * height` passes
pub const CASCADE_CAP_FACTOR: u32 = 3;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation duration (also used for the revert animation)
pub const SWAP_ANIM_MS: u32 = 300;

/// Pause before reverting a swap that produced no match
pub const REVERT_SETTLE_MS: u32 = 200;

/// Collapse/refill animation per cascade pass
pub const FALL_ANIM_MS: u32 = 500;

/// Display progress catch-up rate, in progress units per second
pub const PROGRESS_SMOOTH_RATE: f32 = 50.0;

/// Baseline points per tile kind, by ascending kind index
pub const BASELINE_POINTS: [u32; 6] = [10, 20, 30, 40, 50, 60];

/// Baseline progress per tile kind, by ascending kind index
///
/// Deliberately not proportional to [`BASELINE_POINTS`].
pub const BASELINE_PROGRESS: [f32; 6] = [1.0, 2.0, 3.0, 5.0, 8.0, 10.0];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_tables_match_reference_values() {
        assert_eq!(BASELINE_POINTS, [10, 20, 30, 40, 50, 60]);
        assert_eq!(BASELINE_PROGRESS, [1.0, 2.0, 3.0, 5.0, 8.0, 10.0]);
    }

    #[test]
    fn pos_adjacency_is_symmetric_and_irreflexive() {
        let c = Pos::new(3, 3);
        assert!(!c.is_adjacent(c));
        for other in [Pos::new(2, 3), Pos::new(4, 3), Pos::new(3, 2), Pos::new(3, 4)] {
            assert!(c.is_adjacent(other));
            assert!(other.is_adjacent(c));
        }
        assert!(!c.is_adjacent(Pos::new(4, 4)));
        assert!(!c.is_adjacent(Pos::new(5, 3)));
    }

    #[test]
    fn pos_orders_column_major() {
        assert!(Pos::new(0, 6) < Pos::new(1, 0));
        assert!(Pos::new(1, 0) < Pos::new(1, 1));
    }

    #[test]
    fn board_event_serializes_with_type_tag() {
        let ev = BoardEvent::TileSpawned {
            pos: Pos::new(1, 2),
            kind: TileKind::new(3),
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert_eq!(json, r#"{"type":"tileSpawned","pos":{"x":1,"y":2},"kind":3}"#);
    }
}

/// A tile kind, identified by its index into the tile catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileKind(u8);

impl TileKind {
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Single-letter label (`A` for kind 0, `B` for kind 1, ...)
    ///
    /// ```
    /// use tui_match3_types::TileKind;
    ///
    /// assert_eq!(TileKind::new(2).letter(), 'C');
    /// assert_eq!(TileKind::new(27).letter(), '?');
    /// ```
    pub fn letter(self) -> char {
        if self.0 < 26 {
            (b'A' + self.0) as char
        } else {
            '?'
        }
    }
}

/// Content of one grid cell
///
/// Position is implicit in the grid; `matched` is only set while a cascade
/// pass is marking cells for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub kind: TileKind,
    pub matched: bool,
}

impl Tile {
    pub const fn new(kind: TileKind) -> Self {
        Self {
            kind,
            matched: false,
        }
    }
}

/// A cell on the grid
///
/// - `None`: Empty (only between removal and refill inside a cascade pass)
/// - `Some(Tile)`: Occupied
pub type Cell = Option<Tile>;

/// Grid coordinate, `y = 0` is the bottom row
///
/// Ordering is column-major (`x` first, then `y`), which is the order cells
/// are visited when a cascade pass removes them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two positions
    pub fn manhattan(self, other: Pos) -> u16 {
        (self.x.abs_diff(other.x) as u16) + (self.y.abs_diff(other.y) as u16)
    }

    /// True iff the positions share one axis and differ by one on the other
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Session phase (state machine)
///
/// ```text
/// Idle -> Swapping -> Resolving -> Idle | Won | Lost
///            \-> (no match) revert -> Idle
/// Won | Lost -> Idle only through restart
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Swapping,
    Resolving,
    Won,
    Lost,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Swapping => "swapping",
            Phase::Resolving => "resolving",
            Phase::Won => "won",
            Phase::Lost => "lost",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Won | Phase::Lost)
    }
}

/// Why a selection or swap request was turned into a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapRejectReason {
    /// The two positions are not orthogonal neighbours
    NotAdjacent,
    /// The move budget is exhausted
    NoMovesLeft,
    /// A swap or cascade is already in flight
    Busy,
    /// The session is won or lost; only restart is accepted
    SessionOver,
    /// The swap produced no match and was reverted
    NoMatch,
    /// A position lies outside the grid
    OutOfBounds,
}

impl SwapRejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapRejectReason::NotAdjacent => "notAdjacent",
            SwapRejectReason::NoMovesLeft => "noMovesLeft",
            SwapRejectReason::Busy => "busy",
            SwapRejectReason::SessionOver => "sessionOver",
            SwapRejectReason::NoMatch => "noMatch",
            SwapRejectReason::OutOfBounds => "outOfBounds",
        }
    }
}

/// State-change notifications emitted by the core for a presentation layer
///
/// Events are queued in emission order and drained by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BoardEvent {
    TileSpawned { pos: Pos, kind: TileKind },
    TileRemoved { pos: Pos, kind: TileKind },
    TileMoved { from: Pos, to: Pos },
    #[serde(rename_all = "camelCase")]
    ScoreChanged { new_score: u32, delta: u32 },
    #[serde(rename_all = "camelCase")]
    ProgressChanged { new_progress: f32, delta: f32 },
    SelectionChanged { selected: Option<Pos> },
    SwapReverted { a: Pos, b: Pos },
    SwapRejected { reason: SwapRejectReason },
    #[serde(rename_all = "camelCase")]
    GameWon { final_score: u32 },
    #[serde(rename_all = "camelCase")]
    GameLost { final_score: u32 },
    BoardReset,
}

/// Player intents produced by input mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    Select,
    Hint,
    Restart,
}

impl GameAction {
    /// Parse action from camelCase string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cursorLeft" => Some(GameAction::CursorLeft),
            "cursorRight" => Some(GameAction::CursorRight),
            "cursorUp" => Some(GameAction::CursorUp),
            "cursorDown" => Some(GameAction::CursorDown),
            "select" => Some(GameAction::Select),
            "hint" => Some(GameAction::Hint),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::CursorLeft => "cursorLeft",
            GameAction::CursorRight => "cursorRight",
            GameAction::CursorUp => "cursorUp",
            GameAction::CursorDown => "cursorDown",
            GameAction::Select => "select",
            GameAction::Hint => "hint",
            GameAction::Restart => "restart",
        }
    }
}
