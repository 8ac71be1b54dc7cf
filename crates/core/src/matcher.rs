//! Match detection
//!
//! A run is a maximal sequence of at least [`MIN_RUN`] consecutive non-empty
//! cells of one kind along a row or a column. [`find_matches`] returns the union
//! of all cells in all runs; a cell in both a horizontal and a vertical run
//! appears once. Runs longer than three are included whole.

use std::collections::BTreeSet;

use crate::grid::Grid;
use crate::types::{Pos, TileKind, MIN_RUN};

/// Matched positions, iterated in column-major order
pub type MatchSet = BTreeSet<Pos>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One qualifying run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    /// Lowest-coordinate cell of the run
    pub start: Pos,
    pub len: u8,
    pub axis: Axis,
    pub kind: TileKind,
}

impl Run {
    /// Cells covered by the run
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.len).map(move |i| match self.axis {
            Axis::Horizontal => Pos::new(self.start.x + i, self.start.y),
            Axis::Vertical => Pos::new(self.start.x, self.start.y + i),
        })
    }
}

/// Scan one line of cells, reporting each qualifying run as `(start_offset, len, kind)`
fn scan_line(len: u8, at: impl Fn(u8) -> Option<TileKind>, mut emit: impl FnMut(u8, u8, TileKind)) {
    let mut start = 0u8;
    while start < len {
        let Some(kind) = at(start) else {
            start += 1;
            continue;
        };
        let mut end = start + 1;
        while end < len && at(end) == Some(kind) {
            end += 1;
        }
        let run_len = end - start;
        if run_len as usize >= MIN_RUN {
            emit(start, run_len, kind);
        }
        start = end;
    }
}

/// Every qualifying run, rows first (bottom-up), then columns (left to right)
pub fn find_runs(grid: &Grid) -> Vec<Run> {
    let mut runs = Vec::new();

    for y in 0..grid.height() {
        scan_line(
            grid.width(),
            |x| grid.kind_at(Pos::new(x, y)),
            |x, len, kind| {
                runs.push(Run {
                    start: Pos::new(x, y),
                    len,
                    axis: Axis::Horizontal,
                    kind,
                })
            },
        );
    }

    for x in 0..grid.width() {
        scan_line(
            grid.height(),
            |y| grid.kind_at(Pos::new(x, y)),
            |y, len, kind| {
                runs.push(Run {
                    start: Pos::new(x, y),
                    len,
                    axis: Axis::Vertical,
                    kind,
                })
            },
        );
    }

    runs
}

/// All cells belonging to any run
pub fn find_matches(grid: &Grid) -> MatchSet {
    let mut set = MatchSet::new();
    for run in find_runs(grid) {
        set.extend(run.positions());
    }
    set
}

/// True if any run exists (early exit)
pub fn has_match(grid: &Grid) -> bool {
    let min = MIN_RUN as u8;
    let w = grid.width();
    let h = grid.height();

    for y in 0..h {
        for x in 0..w {
            let Some(kind) = grid.kind_at(Pos::new(x, y)) else {
                continue;
            };
            let fits_x = (x as u16) + (min as u16) <= w as u16;
            let fits_y = (y as u16) + (min as u16) <= h as u16;
            if fits_x && (1..min).all(|i| grid.kind_at(Pos::new(x + i, y)) == Some(kind)) {
                return true;
            }
            if fits_y && (1..min).all(|i| grid.kind_at(Pos::new(x, y + i)) == Some(kind)) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_horizontal_triple() {
        let grid = Grid::from_rows(&[&[1, 2, 1, 2], &[0, 0, 0, 1]]).unwrap();
        let m = find_matches(&grid);
        assert_eq!(
            m.into_iter().collect::<Vec<_>>(),
            vec![Pos::new(0, 0), Pos::new(1, 0), Pos::new(2, 0)]
        );
    }

    #[test]
    fn detects_vertical_run_of_four_whole() {
        let grid = Grid::from_rows(&[&[2, 1], &[2, 0], &[2, 1], &[2, 0]]).unwrap();
        let runs = find_runs(&grid);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].len, 4);
        assert_eq!(runs[0].axis, Axis::Vertical);
        assert_eq!(find_matches(&grid).len(), 4);
    }

    #[test]
    fn cross_shape_is_union() {
        // Plus sign of kind 0 centred at (1, 1).
        let grid = Grid::from_rows(&[&[1, 0, 2], &[0, 0, 0], &[2, 0, 1]]).unwrap();
        let m = find_matches(&grid);
        assert_eq!(m.len(), 5);
        assert!(m.contains(&Pos::new(1, 1)));
        assert_eq!(find_runs(&grid).len(), 2);
    }

    #[test]
    fn empty_cells_break_runs() {
        let mut grid = Grid::from_rows(&[&[0, 0, 0, 0]]).unwrap();
        grid.set(Pos::new(2, 0), None).unwrap();
        assert!(find_matches(&grid).is_empty());
        assert!(!has_match(&grid));
    }

    #[test]
    fn has_match_agrees_with_find_matches() {
        let with = Grid::from_rows(&[&[1, 0], &[1, 2], &[1, 0]]).unwrap();
        let without = Grid::from_rows(&[&[1, 0], &[2, 1], &[1, 0]]).unwrap();
        assert!(has_match(&with));
        assert!(!find_matches(&with).is_empty());
        assert!(!has_match(&without));
        assert!(find_matches(&without).is_empty());
    }
}
