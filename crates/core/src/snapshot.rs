use crate::types::{Phase, Pos, TileKind, DEFAULT_COMPLETION_THRESHOLD};

/// Owned, renderer-facing copy of a session
///
/// `cells` is row-major (`y * width + x`) with `0` for an empty cell and
/// `kind + 1` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<u8>,
    pub selected: Option<Pos>,
    pub score: u32,
    pub moves_remaining: u32,
    pub progress: f32,
    pub display_progress: f32,
    pub completion_threshold: f32,
    pub phase: Phase,
    pub episode_id: u32,
    pub seed: u64,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.cells.clear();
        self.selected = None;
        self.score = 0;
        self.moves_remaining = 0;
        self.progress = 0.0;
        self.display_progress = 0.0;
        self.completion_threshold = DEFAULT_COMPLETION_THRESHOLD;
        self.phase = Phase::Idle;
        self.episode_id = 0;
        self.seed = 0;
    }

    /// Kind at `pos`, `None` when empty or outside the snapshot
    pub fn cell(&self, pos: Pos) -> Option<TileKind> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        let idx = (pos.y as usize) * (self.width as usize) + (pos.x as usize);
        match self.cells.get(idx).copied() {
            Some(0) | None => None,
            Some(code) => Some(TileKind::new(code - 1)),
        }
    }

    /// True while the session accepts selections
    pub fn playable(&self) -> bool {
        self.phase == Phase::Idle && self.moves_remaining > 0
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        let mut s = Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            selected: None,
            score: 0,
            moves_remaining: 0,
            progress: 0.0,
            display_progress: 0.0,
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            phase: Phase::Idle,
            episode_id: 0,
            seed: 0,
        };
        s.clear();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_decodes_codes() {
        let snap = GameSnapshot {
            width: 2,
            height: 2,
            cells: vec![1, 0, 3, 6],
            ..GameSnapshot::default()
        };
        assert_eq!(snap.cell(Pos::new(0, 0)), Some(TileKind::new(0)));
        assert_eq!(snap.cell(Pos::new(1, 0)), None);
        assert_eq!(snap.cell(Pos::new(0, 1)), Some(TileKind::new(2)));
        assert_eq!(snap.cell(Pos::new(1, 1)), Some(TileKind::new(5)));
        assert_eq!(snap.cell(Pos::new(2, 0)), None);
    }

    #[test]
    fn playable_needs_idle_phase_and_moves() {
        let mut snap = GameSnapshot {
            moves_remaining: 2,
            ..GameSnapshot::default()
        };
        assert!(snap.playable());
        snap.phase = Phase::Resolving;
        assert!(!snap.playable());
        snap.phase = Phase::Idle;
        snap.moves_remaining = 0;
        assert!(!snap.playable());
    }
}
