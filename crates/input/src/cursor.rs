//! Board cursor for keyboard play.

use crate::types::{GameAction, Pos};

/// A position clamped to a `width x height` board
///
/// Up moves toward higher `y` (the board is drawn with `y = 0` at the bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    width: u8,
    height: u8,
}

impl Cursor {
    /// Cursor starting at the bottom-left cell
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            pos: Pos::new(0, 0),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    /// Move to `pos`; ignored if outside the board
    pub fn set(&mut self, pos: Pos) -> bool {
        if pos.x < self.width && pos.y < self.height {
            self.pos = pos;
            true
        } else {
            false
        }
    }

    /// Track a new board size, pulling the cursor inside it
    pub fn resize(&mut self, width: u8, height: u8) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.pos.x = self.pos.x.min(self.width - 1);
        self.pos.y = self.pos.y.min(self.height - 1);
    }

    /// Apply a cursor action; returns true if the cursor moved
    ///
    /// Non-cursor actions are ignored.
    pub fn apply(&mut self, action: GameAction) -> bool {
        let Pos { x, y } = self.pos;
        let next = match action {
            GameAction::CursorLeft => Pos::new(x.saturating_sub(1), y),
            GameAction::CursorRight => Pos::new((x + 1).min(self.width - 1), y),
            GameAction::CursorDown => Pos::new(x, y.saturating_sub(1)),
            GameAction::CursorUp => Pos::new(x, (y + 1).min(self.height - 1)),
            GameAction::Select | GameAction::Hint | GameAction::Restart => return false,
        };
        let moved = next != self.pos;
        self.pos = next;
        moved
    }
}
