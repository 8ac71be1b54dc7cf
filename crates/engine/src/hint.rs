//! Hint finder: the first adjacent swap that produces a match

use crate::core::{has_match, BoardSession, Grid, SelectOutcome};
use crate::types::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintError {
    NotPlayable,
    NoMatchingSwap,
}

impl HintError {
    pub fn code(self) -> &'static str {
        match self {
            HintError::NotPlayable => "not_playable",
            HintError::NoMatchingSwap => "no_matching_swap",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            HintError::NotPlayable => "session is not accepting swaps",
            HintError::NoMatchingSwap => "no adjacent swap produces a match",
        }
    }
}

/// First adjacent swap that produces a match
///
/// Pairs are tried in column-major order of their first cell, pairing each cell
/// with its right neighbour and then its upper neighbour. The caller's grid is
/// not touched.
pub fn find_matching_swap(grid: &Grid) -> Option<(Pos, Pos)> {
    let mut scratch = grid.clone();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let a = Pos::new(x, y);
            for b in grid.neighbors(a).into_iter().filter(|&n| n > a) {
                // `a` is in bounds and `b` came from its neighbours.
                if scratch.swap(a, b).is_err() {
                    continue;
                }
                let found = has_match(&scratch);
                let restored = scratch.swap(a, b);
                debug_assert!(restored.is_ok(), "failed to undo scratch swap {a} <-> {b}");
                if found {
                    return Some((a, b));
                }
            }
        }
    }
    None
}

/// Queue the hinted swap on the session
pub fn apply_hint(session: &mut BoardSession) -> Result<(Pos, Pos), HintError> {
    if !session.is_playable() {
        return Err(HintError::NotPlayable);
    }
    let (a, b) = find_matching_swap(session.grid()).ok_or(HintError::NoMatchingSwap)?;
    match session.request_swap(a, b) {
        SelectOutcome::SwapQueued => Ok((a, b)),
        SelectOutcome::Selected | SelectOutcome::Rejected(_) => Err(HintError::NotPlayable),
    }
}
