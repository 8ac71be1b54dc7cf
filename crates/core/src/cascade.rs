//! Cascade resolver - remove, collapse, refill, re-detect
//!
//! One call to [`CascadeResolver::step`] is one pass:
//!
//! 1. mark every pending matched cell
//! 2. score each marked tile through the catalog
//! 3. empty the marked cells
//! 4. collapse columns toward `y = 0`
//! 5. refill empty cells from the top with unbiased kinds
//! 6. detect matches again; they become the next pass's pending set
//!
//! Refills are random, so settling is only almost-sure. The pass count is capped;
//! reaching the cap with matches still pending is an internal fault that is
//! logged and recovered by re-rolling the offending cells (no score awarded),
//! or by regenerating the whole grid when re-rolling keeps failing.

use tracing::{error, trace};

use crate::catalog::{TileCatalog, TileSpec};
use crate::error::Error;
use crate::generation::GenerationPolicy;
use crate::grid::Grid;
use crate::matcher::{find_matches, MatchSet};
use crate::types::{Pos, TileKind, CASCADE_CAP_FACTOR};

/// Result of one cascade pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeStep {
    /// 1-based pass number within the current cascade
    pub pass: u32,
    /// Removed tiles, column-major
    pub removed: Vec<(Pos, TileKind)>,
    /// Collapse moves `(from, to)`
    pub moved: Vec<(Pos, Pos)>,
    /// Refilled cells, column-major
    pub spawned: Vec<(Pos, TileKind)>,
    pub points: u32,
    pub progress: f32,
    /// No matches remain after this pass
    pub settled: bool,
    /// The pass cap was hit and the grid was forced stable
    pub overrun: bool,
    /// Re-rolling gave up and the whole grid was regenerated
    pub regenerated: bool,
}

#[derive(Debug, Clone)]
pub struct CascadeResolver {
    pending: MatchSet,
    passes: u32,
    cap: u32,
    /// Re-roll rounds before regenerating; `None` means the grid's area
    reroll_limit: Option<usize>,
}

impl CascadeResolver {
    pub fn new(cap: u32) -> Self {
        Self {
            pending: MatchSet::new(),
            passes: 0,
            cap,
            reroll_limit: None,
        }
    }

    /// Resolver with the standard cap for this grid's size
    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(CASCADE_CAP_FACTOR * grid.area() as u32)
    }

    /// Begin a cascade from an already detected match set
    pub fn start(&mut self, matches: MatchSet) {
        self.pending = matches;
        self.passes = 0;
    }

    /// Drop any in-flight cascade
    pub fn reset(&mut self) {
        self.pending.clear();
        self.passes = 0;
    }

    pub fn pending(&self) -> &MatchSet {
        &self.pending
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn set_cap(&mut self, cap: u32) {
        self.cap = cap;
    }

    /// Bound the re-roll rounds of overrun recovery
    pub fn set_reroll_limit(&mut self, limit: usize) {
        self.reroll_limit = Some(limit);
    }

    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run one pass; a settled resolver returns an empty settled step
    pub fn step(
        &mut self,
        grid: &mut Grid,
        policy: &mut GenerationPolicy,
        catalog: &TileCatalog,
    ) -> CascadeStep {
        if self.pending.is_empty() {
            return CascadeStep {
                pass: self.passes,
                settled: true,
                ..CascadeStep::default()
            };
        }

        if self.passes >= self.cap {
            return self.force_stable(grid, policy);
        }

        self.passes += 1;
        let mut step = CascadeStep {
            pass: self.passes,
            ..CascadeStep::default()
        };

        for &pos in &self.pending {
            grid.mark(pos);
        }

        step.removed = grid.clear_matched();
        for &(_, kind) in &step.removed {
            let spec = catalog.score_tile(kind).unwrap_or_else(|err| {
                error!(%err, kind = kind.index(), "removed tile has no catalog entry");
                TileSpec::default()
            });
            step.points = step.points.saturating_add(spec.points);
            step.progress += spec.progress;
        }

        step.moved = grid.collapse();
        step.spawned = refill(grid, policy);

        self.pending = find_matches(grid);
        step.settled = self.pending.is_empty();

        trace!(
            pass = step.pass,
            removed = step.removed.len(),
            points = step.points,
            next_matches = self.pending.len(),
            "cascade pass"
        );

        step
    }

    /// Re-roll matched cells until the grid is stable
    fn force_stable(&mut self, grid: &mut Grid, policy: &mut GenerationPolicy) -> CascadeStep {
        let err = Error::CascadeOverrun {
            passes: self.passes,
            cap: self.cap,
        };
        error!(%err, pending = self.pending.len(), "forcing grid stable");

        let mut step = CascadeStep {
            pass: self.passes,
            overrun: true,
            ..CascadeStep::default()
        };

        let mut matches = std::mem::take(&mut self.pending);
        let limit = self.reroll_limit.unwrap_or(grid.area());
        let mut attempts = 0usize;
        while !matches.is_empty() && attempts < limit {
            for &pos in &matches {
                let Some(old) = grid.kind_at(pos) else {
                    continue;
                };
                let new = policy.stable_kind(grid, pos);
                if new != old {
                    grid.put(pos, new);
                    step.removed.push((pos, old));
                    step.spawned.push((pos, new));
                }
            }
            attempts += 1;
            matches = find_matches(grid);
        }

        if !matches.is_empty() {
            error!(attempts, "re-rolling did not stabilise the grid, regenerating");
            step.regenerated = true;
            for x in 0..grid.width() {
                for y in 0..grid.height() {
                    let pos = Pos::new(x, y);
                    if let Some(kind) = grid.kind_at(pos) {
                        step.removed.push((pos, kind));
                    }
                }
            }
            policy.generate(grid);
            for x in 0..grid.width() {
                for y in 0..grid.height() {
                    let pos = Pos::new(x, y);
                    if let Some(kind) = grid.kind_at(pos) {
                        step.spawned.push((pos, kind));
                    }
                }
            }
        }

        step.settled = true;
        step
    }

    /// Drive passes until settled, returning every step
    pub fn run_to_quiescence(
        &mut self,
        grid: &mut Grid,
        policy: &mut GenerationPolicy,
        catalog: &TileCatalog,
    ) -> Vec<CascadeStep> {
        let mut steps = Vec::new();
        while !self.is_settled() {
            steps.push(self.step(grid, policy, catalog));
        }
        steps
    }
}

/// Fill every empty cell with an unbiased kind, column-major
fn refill(grid: &mut Grid, policy: &mut GenerationPolicy) -> Vec<(Pos, TileKind)> {
    let empty = grid.empty_positions();
    let mut spawned = Vec::with_capacity(empty.len());
    for pos in empty {
        let kind = policy.refill_kind();
        grid.put(pos, kind);
        spawned.push((pos, kind));
    }
    spawned
}
