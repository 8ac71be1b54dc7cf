//! Board session - the top-level state machine
//!
//! Owns the grid, the catalog, the generation policy, the cascade resolver and
//! all session counters. Hosts drive it through discrete synchronous calls:
//!
//! ```text
//! select_tile / request_swap  Idle -> Swapping
//! begin_swap                  charge a move, swap, detect
//! revert_swap                 (no match) swap back, refund, -> Idle
//! commit_swap_if_matched      (match) -> Resolving
//! begin_cascade_step          one remove/collapse/refill pass
//! cascade_complete            -> Idle | Won | Lost
//! ```
//!
//! The session never sleeps; pacing between calls belongs to the driver.
//! Every observable change is queued as a [`BoardEvent`].

use tracing::{debug, warn};

use crate::cascade::{CascadeResolver, CascadeStep};
use crate::catalog::TileCatalog;
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::generation::GenerationPolicy;
use crate::grid::Grid;
use crate::matcher::find_matches;
use crate::progress::ProgressTracker;
use crate::snapshot::GameSnapshot;
use crate::types::{BoardEvent, Phase, Pos, SwapRejectReason};

/// Outcome of the detection run inside [`BoardSession::begin_swap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapCheck {
    Matched,
    NoMatch,
}

/// Result of a selection or swap request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The selection was set or replaced
    Selected,
    /// Two adjacent tiles were chosen; the session is now `Swapping`
    SwapQueued,
    /// No-op; a `SwapRejected` event carries the same reason
    Rejected(SwapRejectReason),
}

#[derive(Debug, Clone)]
pub struct BoardSession {
    config: SessionConfig,
    catalog: TileCatalog,
    grid: Grid,
    policy: GenerationPolicy,
    resolver: CascadeResolver,
    progress: ProgressTracker,
    score: u32,
    moves_remaining: u32,
    selected: Option<Pos>,
    pending_swap: Option<(Pos, Pos)>,
    swap_check: Option<SwapCheck>,
    phase: Phase,
    /// Monotonic episode id (increments on restart and configure).
    episode_id: u32,
    events: Vec<BoardEvent>,
}

impl BoardSession {
    /// Start a session with the baseline catalog and a fresh match-free grid
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let catalog = TileCatalog::baseline(config.tile_type_count);
        Self::with_catalog(config, catalog, seed)
    }

    /// Start a session with a custom catalog
    pub fn with_catalog(config: SessionConfig, catalog: TileCatalog, seed: u64) -> Result<Self> {
        config.validate()?;
        check_catalog(&config, &catalog)?;

        let grid = Grid::new(config.width, config.height);
        let mut session = Self::assemble(config, catalog, grid, seed);
        session.policy.generate(&mut session.grid);
        session.announce_board();
        debug!(
            width = config.width,
            height = config.height,
            kinds = config.tile_type_count,
            moves = config.initial_moves,
            seed,
            "session started"
        );
        Ok(session)
    }

    /// Start from an explicit, fully populated grid
    ///
    /// The grid must already be stable: a board holding a run is rejected.
    pub fn with_grid(config: SessionConfig, grid: Grid, seed: u64) -> Result<Self> {
        config.validate()?;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(Error::InvalidConfig(format!(
                "grid is {}x{}, configuration expects {}x{}",
                grid.width(),
                grid.height(),
                config.width,
                config.height
            )));
        }
        if !grid.is_full() {
            return Err(Error::InvalidConfig("starting grid has empty cells".into()));
        }
        let catalog = TileCatalog::baseline(config.tile_type_count);
        for tile in grid.cells().iter().flatten() {
            catalog.score_tile(tile.kind)?;
        }
        let runs = find_matches(&grid);
        if !runs.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "starting grid already contains {} matched cells",
                runs.len()
            )));
        }

        let mut session = Self::assemble(config, catalog, grid, seed);
        session.announce_board();
        Ok(session)
    }

    fn assemble(config: SessionConfig, catalog: TileCatalog, grid: Grid, seed: u64) -> Self {
        Self {
            config,
            catalog,
            grid,
            policy: GenerationPolicy::new(seed, config.tile_type_count),
            resolver: CascadeResolver::new(config.cascade_cap()),
            progress: ProgressTracker::new(config.completion_threshold),
            score: 0,
            moves_remaining: config.initial_moves,
            selected: None,
            pending_swap: None,
            swap_check: None,
            phase: Phase::Idle,
            episode_id: 0,
            events: Vec::new(),
        }
    }

    /// Apply new parameters; on error the session is left untouched
    ///
    /// On success this behaves as [`restart`](Self::restart) with the new
    /// configuration. A custom catalog survives if its size still fits.
    pub fn configure(&mut self, config: SessionConfig) -> Result<()> {
        if let Err(err) = config.validate() {
            warn!(%err, "configuration rejected");
            return Err(err);
        }
        if self.catalog.len() != config.tile_type_count as usize {
            self.catalog = TileCatalog::baseline(config.tile_type_count);
        }
        self.config = config;
        self.grid = Grid::new(config.width, config.height);
        self.policy.set_kind_count(config.tile_type_count);
        self.resolver.set_cap(config.cascade_cap());
        self.progress.set_threshold(config.completion_threshold);
        debug!(
            width = config.width,
            height = config.height,
            kinds = config.tile_type_count,
            moves = config.initial_moves,
            "session reconfigured"
        );
        self.restart();
        Ok(())
    }

    /// Reset counters and regenerate a match-free grid
    ///
    /// Accepted in every phase; an in-flight swap or cascade is discarded.
    pub fn restart(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.score = 0;
        self.moves_remaining = self.config.initial_moves;
        self.progress.reset();
        self.selected = None;
        self.pending_swap = None;
        self.swap_check = None;
        self.resolver.reset();
        self.phase = Phase::Idle;
        self.policy.generate(&mut self.grid);
        self.announce_board();
        debug!(episode = self.episode_id, "session restarted");
    }

    fn announce_board(&mut self) {
        self.events.push(BoardEvent::BoardReset);
        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                let pos = Pos::new(x, y);
                if let Some(kind) = self.grid.kind_at(pos) {
                    self.events.push(BoardEvent::TileSpawned { pos, kind });
                }
            }
        }
    }

    fn reject(&mut self, reason: SwapRejectReason) -> SelectOutcome {
        self.events.push(BoardEvent::SwapRejected { reason });
        SelectOutcome::Rejected(reason)
    }

    /// Shared guards for selection and swap requests, in priority order
    fn guard(&self, positions: &[Pos]) -> Option<SwapRejectReason> {
        if positions.iter().any(|&p| !self.grid.contains(p)) {
            return Some(SwapRejectReason::OutOfBounds);
        }
        if self.phase.is_terminal() {
            return Some(SwapRejectReason::SessionOver);
        }
        if self.phase != Phase::Idle {
            return Some(SwapRejectReason::Busy);
        }
        if self.moves_remaining == 0 {
            return Some(SwapRejectReason::NoMovesLeft);
        }
        None
    }

    fn set_selected(&mut self, selected: Option<Pos>) {
        if self.selected != selected {
            self.selected = selected;
            self.events.push(BoardEvent::SelectionChanged { selected });
        }
    }

    /// Player selection: select, replace the selection, or queue a swap
    pub fn select_tile(&mut self, pos: Pos) -> SelectOutcome {
        if let Some(reason) = self.guard(&[pos]) {
            return self.reject(reason);
        }

        match self.selected {
            Some(first) if first.is_adjacent(pos) => {
                self.pending_swap = Some((first, pos));
                self.swap_check = None;
                self.phase = Phase::Swapping;
                SelectOutcome::SwapQueued
            }
            _ => {
                self.set_selected(Some(pos));
                SelectOutcome::Selected
            }
        }
    }

    /// Programmatic swap entry; non-adjacent pairs are rejected
    pub fn request_swap(&mut self, a: Pos, b: Pos) -> SelectOutcome {
        if let Some(reason) = self.guard(&[a, b]) {
            return self.reject(reason);
        }
        if !self.grid.are_adjacent(a, b) {
            return self.reject(SwapRejectReason::NotAdjacent);
        }

        self.set_selected(Some(a));
        self.pending_swap = Some((a, b));
        self.swap_check = None;
        self.phase = Phase::Swapping;
        SelectOutcome::SwapQueued
    }

    /// Charge a move, perform the queued swap and run detection
    ///
    /// Returns `None` when no swap is queued or it was already begun.
    pub fn begin_swap(&mut self) -> Option<SwapCheck> {
        if self.phase != Phase::Swapping || self.swap_check.is_some() {
            return None;
        }
        let (a, b) = self.pending_swap?;
        // Queued positions passed the bounds guard.
        self.grid.swap(a, b).ok()?;
        self.moves_remaining = self.moves_remaining.saturating_sub(1);
        self.events.push(BoardEvent::TileMoved { from: a, to: b });
        self.events.push(BoardEvent::TileMoved { from: b, to: a });

        let matches = find_matches(&self.grid);
        let check = if matches.is_empty() {
            SwapCheck::NoMatch
        } else {
            self.resolver.start(matches);
            SwapCheck::Matched
        };
        self.swap_check = Some(check);
        debug!(%a, %b, ?check, moves = self.moves_remaining, "swap performed");
        Some(check)
    }

    /// Enter `Resolving` if the begun swap produced a match
    pub fn commit_swap_if_matched(&mut self) -> bool {
        if self.phase != Phase::Swapping || self.swap_check != Some(SwapCheck::Matched) {
            return false;
        }
        self.phase = Phase::Resolving;
        true
    }

    /// Undo a non-matching swap and refund its move
    pub fn revert_swap(&mut self) -> bool {
        if self.phase != Phase::Swapping || self.swap_check != Some(SwapCheck::NoMatch) {
            return false;
        }
        let Some((a, b)) = self.pending_swap.take() else {
            return false;
        };
        if self.grid.swap(a, b).is_err() {
            return false;
        }
        self.moves_remaining += 1;
        self.swap_check = None;
        self.events.push(BoardEvent::TileMoved { from: b, to: a });
        self.events.push(BoardEvent::TileMoved { from: a, to: b });
        self.events.push(BoardEvent::SwapReverted { a, b });
        self.events.push(BoardEvent::SwapRejected {
            reason: SwapRejectReason::NoMatch,
        });
        self.set_selected(None);
        self.phase = Phase::Idle;
        true
    }

    /// Run one cascade pass, awarding score and progress for removed tiles
    ///
    /// Returns `None` outside `Resolving` or once the cascade has settled.
    pub fn begin_cascade_step(&mut self) -> Option<CascadeStep> {
        if self.phase != Phase::Resolving || self.resolver.is_settled() {
            return None;
        }
        let step = self
            .resolver
            .step(&mut self.grid, &mut self.policy, &self.catalog);

        for &(pos, kind) in &step.removed {
            self.events.push(BoardEvent::TileRemoved { pos, kind });
        }
        if step.points > 0 {
            self.score = self.score.saturating_add(step.points);
            self.events.push(BoardEvent::ScoreChanged {
                new_score: self.score,
                delta: step.points,
            });
        }
        let applied = self.progress.add(step.progress);
        if applied > 0.0 {
            self.events.push(BoardEvent::ProgressChanged {
                new_progress: self.progress.current(),
                delta: applied,
            });
        }
        for &(from, to) in &step.moved {
            self.events.push(BoardEvent::TileMoved { from, to });
        }
        for &(pos, kind) in &step.spawned {
            self.events.push(BoardEvent::TileSpawned { pos, kind });
        }

        Some(step)
    }

    /// Finish a settled cascade and evaluate terminal conditions
    ///
    /// Completion takes precedence over an exhausted move budget.
    pub fn cascade_complete(&mut self) -> bool {
        if self.phase != Phase::Resolving || !self.resolver.is_settled() {
            return false;
        }
        self.pending_swap = None;
        self.swap_check = None;
        self.set_selected(None);

        self.phase = if self.progress.is_complete() {
            self.events.push(BoardEvent::GameWon {
                final_score: self.score,
            });
            Phase::Won
        } else if self.moves_remaining == 0 {
            self.events.push(BoardEvent::GameLost {
                final_score: self.score,
            });
            Phase::Lost
        } else {
            Phase::Idle
        };
        debug!(
            phase = self.phase.as_str(),
            score = self.score,
            progress = self.progress.current(),
            moves = self.moves_remaining,
            "cascade settled"
        );
        true
    }

    /// Run every pending suspension point without pacing
    ///
    /// Returns the phase the session ends in.
    pub fn settle(&mut self) -> Phase {
        if self.phase == Phase::Swapping {
            match self.swap_check.or_else(|| self.begin_swap()) {
                Some(SwapCheck::NoMatch) => {
                    self.revert_swap();
                }
                Some(SwapCheck::Matched) => {
                    self.commit_swap_if_matched();
                }
                None => {}
            }
        }
        if self.phase == Phase::Resolving {
            while self.begin_cascade_step().is_some() {}
            self.cascade_complete();
        }
        self.phase
    }

    /// Advance presentation-only state (progress display easing)
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.progress.tick(elapsed_ms);
    }

    /// Take all queued events in emission order
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queued events not yet drained
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn pending_swap(&self) -> Option<(Pos, Pos)> {
        self.pending_swap
    }

    pub fn swap_check(&self) -> Option<SwapCheck> {
        self.swap_check
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn seed(&self) -> u64 {
        self.policy.seed()
    }

    pub fn cascade_passes(&self) -> u32 {
        self.resolver.passes()
    }

    /// True while the session accepts selections
    pub fn is_playable(&self) -> bool {
        self.phase == Phase::Idle && self.moves_remaining > 0
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        self.grid.write_codes(&mut out.cells);
        out.selected = self.selected;
        out.score = self.score;
        out.moves_remaining = self.moves_remaining;
        out.progress = self.progress.current();
        out.display_progress = self.progress.display();
        out.completion_threshold = self.progress.threshold();
        out.phase = self.phase;
        out.episode_id = self.episode_id;
        out.seed = self.policy.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

fn check_catalog(config: &SessionConfig, catalog: &TileCatalog) -> Result<()> {
    if catalog.len() != config.tile_type_count as usize {
        return Err(Error::CatalogMismatch {
            expected: catalog.len(),
            actual: config.tile_type_count as usize,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TileSpec;
    use crate::types::TileKind;

    /// `(x + 2y) % 6`: no runs in either axis
    fn striped(width: u8, height: u8) -> Grid {
        Grid::from_fn(width, height, |p| TileKind::new((p.x + 2 * p.y) % 6))
    }

    fn session_on(grid: Grid) -> BoardSession {
        let config = SessionConfig::new(grid.width(), grid.height(), 6, 10);
        let mut s = BoardSession::with_grid(config, grid, 7).unwrap();
        s.drain_events();
        s
    }

    #[test]
    fn test_new_session() {
        let session = BoardSession::new(SessionConfig::default(), 12345).unwrap();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.moves_remaining(), 10);
        assert_eq!(session.episode_id(), 0);
        assert!(session.grid().is_full());
        assert!(find_matches(session.grid()).is_empty());

        let events = session.events();
        assert_eq!(events[0], BoardEvent::BoardReset);
        assert_eq!(events.len(), 1 + 49);
    }

    #[test]
    fn test_catalog_size_must_match() {
        let catalog = TileCatalog::from_entries(vec![TileSpec::new(1, 1.0); 4]).unwrap();
        let err = BoardSession::with_catalog(SessionConfig::default(), catalog, 1).unwrap_err();
        assert_eq!(
            err,
            Error::CatalogMismatch {
                expected: 4,
                actual: 6
            }
        );
    }

    #[test]
    fn test_with_grid_rejects_unknown_kind() {
        let grid = Grid::from_fn(3, 3, |p| TileKind::new((p.x + p.y) % 3));
        let config = SessionConfig::new(3, 3, 3, 5);
        assert!(BoardSession::with_grid(config, grid.clone(), 1).is_ok());

        let mut bad = grid;
        bad.set(Pos::new(1, 1), Some(TileKind::new(5))).unwrap();
        assert!(matches!(
            BoardSession::with_grid(config, bad, 1),
            Err(Error::CatalogMismatch { .. })
        ));
    }

    #[test]
    fn test_with_grid_rejects_existing_run() {
        // Kind-0 triple across the top row of an otherwise stable board.
        let mut grid = striped(7, 7);
        for x in 0..3 {
            grid.set(Pos::new(x, 6), Some(TileKind::new(0))).unwrap();
        }
        let config = SessionConfig::new(7, 7, 6, 10);
        assert!(matches!(
            BoardSession::with_grid(config, grid, 1),
            Err(Error::InvalidConfig(_))
        ));

        // The same board without the run starts, and a dud swap costs nothing.
        let mut s = session_on(striped(7, 7));
        s.request_swap(Pos::new(0, 0), Pos::new(1, 0));
        assert_eq!(s.begin_swap(), Some(SwapCheck::NoMatch));
        assert!(s.revert_swap());
        assert_eq!(s.moves_remaining(), 10);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_select_then_non_adjacent_replaces_selection() {
        let mut s = session_on(striped(5, 5));
        assert_eq!(s.select_tile(Pos::new(0, 0)), SelectOutcome::Selected);
        assert_eq!(s.select_tile(Pos::new(3, 3)), SelectOutcome::Selected);
        assert_eq!(s.selected(), Some(Pos::new(3, 3)));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.moves_remaining(), 10);
    }

    #[test]
    fn test_select_adjacent_queues_swap_without_charging() {
        let mut s = session_on(striped(5, 5));
        s.select_tile(Pos::new(1, 1));
        assert_eq!(s.select_tile(Pos::new(1, 2)), SelectOutcome::SwapQueued);
        assert_eq!(s.phase(), Phase::Swapping);
        assert_eq!(s.pending_swap(), Some((Pos::new(1, 1), Pos::new(1, 2))));
        assert_eq!(s.moves_remaining(), 10);
    }

    #[test]
    fn test_busy_session_rejects_selection() {
        let mut s = session_on(striped(5, 5));
        s.request_swap(Pos::new(0, 0), Pos::new(1, 0));
        s.drain_events();

        assert_eq!(
            s.select_tile(Pos::new(4, 4)),
            SelectOutcome::Rejected(SwapRejectReason::Busy)
        );
        assert_eq!(
            s.drain_events(),
            vec![BoardEvent::SwapRejected {
                reason: SwapRejectReason::Busy
            }]
        );
    }

    #[test]
    fn test_out_of_bounds_selection_is_rejected() {
        let mut s = session_on(striped(5, 5));
        assert_eq!(
            s.select_tile(Pos::new(5, 0)),
            SelectOutcome::Rejected(SwapRejectReason::OutOfBounds)
        );
        assert_eq!(s.selected(), None);
    }

    #[test]
    fn test_request_swap_rejects_non_adjacent() {
        let mut s = session_on(striped(5, 5));
        assert_eq!(
            s.request_swap(Pos::new(0, 0), Pos::new(2, 0)),
            SelectOutcome::Rejected(SwapRejectReason::NotAdjacent)
        );
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn test_non_matching_swap_reverts_and_refunds() {
        let mut s = session_on(striped(5, 5));
        let before = s.grid().clone();
        s.request_swap(Pos::new(0, 0), Pos::new(1, 0));

        assert_eq!(s.begin_swap(), Some(SwapCheck::NoMatch));
        assert_eq!(s.moves_remaining(), 9);
        assert!(!s.commit_swap_if_matched());
        assert!(s.revert_swap());

        assert_eq!(s.grid(), &before);
        assert_eq!(s.moves_remaining(), 10);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.events().contains(&BoardEvent::SwapRejected {
            reason: SwapRejectReason::NoMatch
        }));
    }

    #[test]
    fn test_suspension_points_out_of_order_are_noops() {
        let mut s = session_on(striped(5, 5));
        assert_eq!(s.begin_swap(), None);
        assert!(!s.revert_swap());
        assert!(s.begin_cascade_step().is_none());
        assert!(!s.cascade_complete());
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut s = BoardSession::new(SessionConfig::default(), 3).unwrap();
        s.restart();
        assert_eq!(s.episode_id(), 1);
        assert_eq!(s.moves_remaining(), 10);
        assert!(find_matches(s.grid()).is_empty());
    }

    #[test]
    fn test_configure_invalid_leaves_session_untouched() {
        let mut s = BoardSession::new(SessionConfig::default(), 3).unwrap();
        let grid = s.grid().clone();
        assert!(s.configure(SessionConfig::new(2, 2, 6, 10)).is_err());
        assert_eq!(s.grid(), &grid);
        assert_eq!(s.episode_id(), 0);

        s.configure(SessionConfig::new(5, 4, 4, 3)).unwrap();
        assert_eq!(s.grid().width(), 5);
        assert_eq!(s.grid().height(), 4);
        assert_eq!(s.catalog().len(), 4);
        assert_eq!(s.moves_remaining(), 3);
        assert_eq!(s.episode_id(), 1);
    }

    #[test]
    fn test_snapshot_mirrors_session() {
        let mut s = session_on(striped(4, 3));
        s.select_tile(Pos::new(2, 1));
        let snap = s.snapshot();
        assert_eq!((snap.width, snap.height), (4, 3));
        assert_eq!(snap.cells.len(), 12);
        assert_eq!(snap.cell(Pos::new(2, 1)), s.grid().kind_at(Pos::new(2, 1)));
        assert_eq!(snap.selected, Some(Pos::new(2, 1)));
        assert_eq!(snap.moves_remaining, 10);
        assert!(snap.playable());
    }
}
