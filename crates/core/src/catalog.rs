//! Tile catalog - per-kind score and progress values
//!
//! Scoring is a fixed lookup: every removed tile awards its kind's points and
//! progress. The baseline table keeps the reference values (10/1, 20/2, 30/3,
//! 40/5, 50/8, 60/10); the progress curve is intentionally not proportional to
//! points. Catalogs are data, so any number of kinds is supported.

use crate::error::{Error, Result};
use crate::types::{TileKind, BASELINE_POINTS, BASELINE_PROGRESS};

/// Score awarded for removing one tile of a kind
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TileSpec {
    pub points: u32,
    pub progress: f32,
}

impl TileSpec {
    pub const fn new(points: u32, progress: f32) -> Self {
        Self { points, progress }
    }
}

/// Immutable table of tile kinds, indexed by [`TileKind::index`]
#[derive(Debug, Clone, PartialEq)]
pub struct TileCatalog {
    entries: Vec<TileSpec>,
}

impl TileCatalog {
    /// Baseline catalog with `count` kinds
    ///
    /// Kinds past the reference table keep gaining 10 points per index and
    /// reuse the last progress value.
    pub fn baseline(count: u8) -> Self {
        let last_progress = BASELINE_PROGRESS[BASELINE_PROGRESS.len() - 1];
        let entries = (0..count as usize)
            .map(|i| {
                let points = BASELINE_POINTS
                    .get(i)
                    .copied()
                    .unwrap_or(10 * (i as u32 + 1));
                let progress = BASELINE_PROGRESS.get(i).copied().unwrap_or(last_progress);
                TileSpec::new(points, progress)
            })
            .collect();
        Self { entries }
    }

    /// Catalog from explicit entries; must not be empty
    pub fn from_entries(entries: Vec<TileSpec>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidConfig("tile catalog is empty".into()));
        }
        if entries.len() > u8::MAX as usize {
            return Err(Error::InvalidConfig(format!(
                "tile catalog has {} entries, at most 255 supported",
                entries.len()
            )));
        }
        if entries
            .iter()
            .any(|e| !e.progress.is_finite() || e.progress < 0.0)
        {
            return Err(Error::InvalidConfig(
                "tile progress values must be finite and non-negative".into(),
            ));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, kind: TileKind) -> bool {
        kind.index() < self.entries.len()
    }

    pub fn get(&self, kind: TileKind) -> Option<TileSpec> {
        self.entries.get(kind.index()).copied()
    }

    /// All kinds in ascending index order
    pub fn kinds(&self) -> impl Iterator<Item = TileKind> + '_ {
        (0..self.entries.len()).map(|i| TileKind::new(i as u8))
    }

    /// Points and progress for one removed tile
    pub fn score_tile(&self, kind: TileKind) -> Result<TileSpec> {
        self.get(kind).ok_or(Error::CatalogMismatch {
            expected: self.entries.len(),
            actual: kind.index() + 1,
        })
    }
}
