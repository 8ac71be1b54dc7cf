//! Generation policy - picks tile kinds for empty cells
//!
//! Two modes:
//!
//! - **Initial fill**: a kind that would complete a same-kind triple with the two
//!   tiles to the left or the two tiles below is excluded; the pick is uniform
//!   over what remains (falling back to every kind if nothing remains).
//! - **Refill** (cascades): uniform over every kind, no avoidance. Cascade-made
//!   matches are expected and simply resolved again.
//!
//! Randomness comes from a seeded [`StdRng`], so the same seed replays the same
//! session.

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::warn;

use crate::grid::Grid;
use crate::matcher::find_matches;
use crate::types::{Pos, TileKind};

/// Whole-grid regeneration attempts before giving up on a clean board
const MAX_GENERATE_ATTEMPTS: u32 = 64;

/// Candidate kinds for an initial-fill cell
///
/// `left2` holds the kinds at `x-1` and `x-2`, `below2` the kinds at `y-1` and
/// `y-2`; each is `None` when the cell is too close to the edge.
pub fn initial_candidates(
    left2: Option<(TileKind, TileKind)>,
    below2: Option<(TileKind, TileKind)>,
    kind_count: u8,
) -> Vec<TileKind> {
    let mut candidates: Vec<TileKind> = (0..kind_count).map(TileKind::new).collect();
    for (a, b) in [left2, below2].into_iter().flatten() {
        if a == b {
            candidates.retain(|&k| k != a);
        }
    }
    candidates
}

/// Random tile source for fills and refills
#[derive(Debug, Clone)]
pub struct GenerationPolicy {
    rng: StdRng,
    seed: u64,
    kind_count: u8,
}

impl GenerationPolicy {
    pub fn new(seed: u64, kind_count: u8) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            kind_count,
        }
    }

    /// Seed this policy was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Change the number of kinds (used when a session is reconfigured)
    pub fn set_kind_count(&mut self, kind_count: u8) {
        self.kind_count = kind_count;
    }

    fn pick(&mut self, candidates: &[TileKind]) -> TileKind {
        if candidates.is_empty() {
            return self.refill_kind();
        }
        candidates[self.rng.random_range(0..candidates.len())]
    }

    /// Match-avoiding pick for initial fill
    pub fn next_kind(
        &mut self,
        left2: Option<(TileKind, TileKind)>,
        below2: Option<(TileKind, TileKind)>,
    ) -> TileKind {
        let candidates = initial_candidates(left2, below2, self.kind_count);
        self.pick(&candidates)
    }

    /// Unbiased pick for cascade refill
    pub fn refill_kind(&mut self) -> TileKind {
        TileKind::new(self.rng.random_range(0..self.kind_count.max(1)))
    }

    /// Fill every cell, column by column from the bottom, avoiding triples
    ///
    /// Each cell only looks left and down, which are already final when it is
    /// visited, so with three or more kinds the result never contains a run.
    pub fn fill_initial(&mut self, grid: &mut Grid) {
        grid.clear();
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let pair = |a: Option<Pos>, b: Option<Pos>| {
                    Some((grid.kind_at(a?)?, grid.kind_at(b?)?))
                };
                let left2 = pair(
                    x.checked_sub(1).map(|px| Pos::new(px, y)),
                    x.checked_sub(2).map(|px| Pos::new(px, y)),
                );
                let below2 = pair(
                    y.checked_sub(1).map(|py| Pos::new(x, py)),
                    y.checked_sub(2).map(|py| Pos::new(x, py)),
                );
                let kind = self.next_kind(left2, below2);
                grid.put(Pos::new(x, y), kind);
            }
        }
    }

    /// Initial fill repeated until the grid holds no match
    pub fn generate(&mut self, grid: &mut Grid) {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            self.fill_initial(grid);
            if find_matches(grid).is_empty() {
                return;
            }
            warn!(attempt, "initial fill produced a match, regenerating");
        }
        warn!(
            attempts = MAX_GENERATE_ATTEMPTS,
            kinds = self.kind_count,
            "could not generate a match-free grid"
        );
    }

    /// Pick a kind for `pos` that forms no run with any neighbour
    ///
    /// Considers both axes in both directions (including the sandwich case).
    /// Falls back to an unbiased pick when every kind is excluded.
    pub fn stable_kind(&mut self, grid: &Grid, pos: Pos) -> TileKind {
        let at = |dx: i16, dy: i16| -> Option<TileKind> {
            let x = u8::try_from(pos.x as i16 + dx).ok()?;
            let y = u8::try_from(pos.y as i16 + dy).ok()?;
            grid.kind_at(Pos::new(x, y))
        };

        let mut excluded: Vec<TileKind> = Vec::new();
        let mut exclude_pair = |a: Option<TileKind>, b: Option<TileKind>| {
            if let (Some(a), Some(b)) = (a, b) {
                if a == b {
                    excluded.push(a);
                }
            }
        };
        for (dx, dy) in [(1i16, 0i16), (0, 1)] {
            exclude_pair(at(-dx, -dy), at(-2 * dx, -2 * dy));
            exclude_pair(at(dx, dy), at(2 * dx, 2 * dy));
            exclude_pair(at(-dx, -dy), at(dx, dy));
        }

        let candidates: Vec<TileKind> = (0..self.kind_count)
            .map(TileKind::new)
            .filter(|k| !excluded.contains(k))
            .collect();
        self.pick(&candidates)
    }
}
