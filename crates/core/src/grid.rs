//! Grid module - manages the tile grid
//!
//! The grid is a `width x height` array where each cell is empty or holds a [`Tile`].
//! Uses a flat `Vec` in row-major order (`y * width + x`) for cache locality.
//! Coordinates: `(x, y)` with `x` growing to the right and `y = 0` the bottom row.
//! Empty cells only exist transiently inside a cascade pass.

use arrayvec::ArrayVec;

use crate::error::{Error, Result};
use crate::types::{Cell, Pos, Tile, TileKind};

/// The tile grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid with every cell empty
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; (width as usize) * (height as usize)],
        }
    }

    /// Create a fully populated grid from a kind-per-position function
    pub fn from_fn(width: u8, height: u8, mut f: impl FnMut(Pos) -> TileKind) -> Self {
        let mut grid = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let pos = Pos::new(x, y);
                if let Some(idx) = grid.index(pos) {
                    grid.cells[idx] = Some(Tile::new(f(pos)));
                }
            }
        }
        grid
    }

    /// Create a grid from kind indices written top row first
    ///
    /// The last slice is the bottom row (`y = 0`), so the literal reads the way
    /// the board looks on screen.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        if width == 0 || height == 0 || width > u8::MAX as usize || height > u8::MAX as usize {
            return Err(Error::InvalidConfig(format!(
                "grid rows must be non-empty and at most 255x255, got {width}x{height}"
            )));
        }
        if rows.iter().any(|r| r.len() != width) {
            return Err(Error::InvalidConfig("grid rows have unequal lengths".into()));
        }

        let height_u8 = height as u8;
        Ok(Self::from_fn(width as u8, height_u8, |pos| {
            let row = rows[(height_u8 - 1 - pos.y) as usize];
            TileKind::new(row[pos.x as usize])
        }))
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        Some((pos.y as usize) * (self.width as usize) + (pos.x as usize))
    }

    fn checked_index(&self, pos: Pos) -> Result<usize> {
        self.index(pos).ok_or(Error::OutOfBounds {
            pos,
            width: self.width,
            height: self.height,
        })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.index(pos).is_some()
    }

    /// Place a tile at a position the caller already knows is in bounds
    ///
    /// Used by generation and cascade code that iterates the grid's own
    /// coordinates.
    pub(crate) fn put(&mut self, pos: Pos, kind: TileKind) {
        debug_assert!(self.contains(pos), "put outside grid at {pos}");
        if let Some(idx) = self.index(pos) {
            self.cells[idx] = Some(Tile::new(kind));
        }
    }

    /// Flag an in-bounds position as matched; empty cells are left alone
    pub(crate) fn mark(&mut self, pos: Pos) {
        debug_assert!(self.contains(pos), "mark outside grid at {pos}");
        if let Some(idx) = self.index(pos) {
            if let Some(tile) = self.cells[idx].as_mut() {
                tile.matched = true;
            }
        }
    }

    /// Tile kind at `pos`, `Ok(None)` for an empty cell
    pub fn get(&self, pos: Pos) -> Result<Option<TileKind>> {
        let idx = self.checked_index(pos)?;
        Ok(self.cells[idx].map(|t| t.kind))
    }

    /// Replace the cell at `pos`; a new tile always starts unmatched
    pub fn set(&mut self, pos: Pos, kind: Option<TileKind>) -> Result<()> {
        let idx = self.checked_index(pos)?;
        self.cells[idx] = kind.map(Tile::new);
        Ok(())
    }

    /// Kind at `pos`, `None` when empty or out of bounds
    ///
    /// Scanning helper for code that walks its own valid coordinates.
    #[inline]
    pub fn kind_at(&self, pos: Pos) -> Option<TileKind> {
        self.index(pos)
            .and_then(|idx| self.cells[idx])
            .map(|t| t.kind)
    }

    /// True iff Manhattan distance between `a` and `b` is exactly 1
    pub fn are_adjacent(&self, a: Pos, b: Pos) -> bool {
        a.is_adjacent(b)
    }

    /// In-bounds orthogonal neighbours of `pos` (left, right, down, up)
    ///
    /// An out-of-bounds `pos` has no neighbours.
    pub fn neighbors(&self, pos: Pos) -> ArrayVec<Pos, 4> {
        let mut out = ArrayVec::new();
        if !self.contains(pos) {
            return out;
        }
        if pos.x > 0 {
            out.push(Pos::new(pos.x - 1, pos.y));
        }
        if pos.x + 1 < self.width {
            out.push(Pos::new(pos.x + 1, pos.y));
        }
        if pos.y > 0 {
            out.push(Pos::new(pos.x, pos.y - 1));
        }
        if pos.y + 1 < self.height {
            out.push(Pos::new(pos.x, pos.y + 1));
        }
        out
    }

    /// Exchange two cells in place
    ///
    /// Adjacency is not checked here; that is the caller's job.
    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<()> {
        let ia = self.checked_index(a)?;
        let ib = self.checked_index(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Empty every matched cell, returning what was removed in column-major order
    pub fn clear_matched(&mut self) -> Vec<(Pos, TileKind)> {
        let mut removed = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let pos = Pos::new(x, y);
                let Some(idx) = self.index(pos) else {
                    continue;
                };
                if let Some(tile) = self.cells[idx] {
                    if tile.matched {
                        removed.push((pos, tile.kind));
                        self.cells[idx] = None;
                    }
                }
            }
        }
        removed
    }

    /// Let tiles fall toward `y = 0`, closing gaps inside each column
    ///
    /// Relative order within a column is preserved. Uses a two-pointer pass per
    /// column and returns every `(from, to)` move performed.
    pub fn collapse(&mut self) -> Vec<(Pos, Pos)> {
        let mut moves = Vec::new();
        let width = self.width as usize;

        for x in 0..self.width {
            let mut write_y: u8 = 0;
            for read_y in 0..self.height {
                let read_idx = (read_y as usize) * width + (x as usize);
                if self.cells[read_idx].is_none() {
                    continue;
                }
                if read_y != write_y {
                    let write_idx = (write_y as usize) * width + (x as usize);
                    self.cells[write_idx] = self.cells[read_idx].take();
                    moves.push((Pos::new(x, read_y), Pos::new(x, write_y)));
                }
                write_y += 1;
            }
        }

        moves
    }

    /// Empty positions in column-major order
    pub fn empty_positions(&self) -> Vec<Pos> {
        let mut out = Vec::new();
        for x in 0..self.width {
            for y in 0..self.height {
                let pos = Pos::new(x, y);
                if self.index(pos).is_some_and(|idx| self.cells[idx].is_none()) {
                    out.push(pos);
                }
            }
        }
        out
    }

    /// True if no cell is empty
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Empty the entire grid
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Write row-major cell codes (`0` empty, `kind + 1` occupied) into `out`
    pub fn write_codes(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(
            self.cells
                .iter()
                .map(|c| c.map_or(0, |t| t.kind.as_u8().saturating_add(1))),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(i: u8) -> Option<TileKind> {
        Some(TileKind::new(i))
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(7, 5);
        assert_eq!(grid.index(Pos::new(0, 0)), Some(0));
        assert_eq!(grid.index(Pos::new(6, 0)), Some(6));
        assert_eq!(grid.index(Pos::new(0, 1)), Some(7));
        assert_eq!(grid.index(Pos::new(6, 4)), Some(34));
        assert_eq!(grid.index(Pos::new(7, 0)), None);
        assert_eq!(grid.index(Pos::new(0, 5)), None);
    }

    #[test]
    fn test_grid_get_set_out_of_bounds() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.set(Pos::new(1, 1), k(2)).is_ok());
        assert_eq!(grid.get(Pos::new(1, 1)), Ok(k(2)));
        assert_eq!(
            grid.get(Pos::new(3, 0)),
            Err(Error::OutOfBounds {
                pos: Pos::new(3, 0),
                width: 3,
                height: 3
            })
        );
        assert!(grid.set(Pos::new(0, 3), k(0)).is_err());
    }

    #[test]
    fn test_from_rows_puts_last_row_at_bottom() {
        let grid = Grid::from_rows(&[&[0, 1, 2], &[3, 4, 5]]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.kind_at(Pos::new(0, 0)), k(3));
        assert_eq!(grid.kind_at(Pos::new(2, 1)), k(2));
    }

    #[test]
    fn test_from_rows_rejects_ragged_rows() {
        assert!(Grid::from_rows(&[&[0, 1, 2], &[3, 4]]).is_err());
        assert!(Grid::from_rows(&[]).is_err());
    }

    #[test]
    fn test_neighbors_at_corner_edge_and_center() {
        let grid = Grid::new(4, 4);
        assert_eq!(grid.neighbors(Pos::new(0, 0)).len(), 2);
        assert_eq!(grid.neighbors(Pos::new(0, 2)).len(), 3);
        assert_eq!(grid.neighbors(Pos::new(2, 2)).len(), 4);
        assert_eq!(grid.neighbors(Pos::new(3, 3)).len(), 2);
    }

    #[test]
    fn test_neighbors_of_outside_position_is_empty() {
        let grid = Grid::new(4, 4);
        assert!(grid.neighbors(Pos::new(4, 0)).is_empty());
        assert!(grid.neighbors(Pos::new(255, 255)).is_empty());
        assert!(grid.neighbors(Pos::new(0, 255)).is_empty());
    }

    #[test]
    fn test_put_and_mark_in_bounds() {
        let mut grid = Grid::new(2, 2);
        grid.put(Pos::new(1, 1), TileKind::new(4));
        assert_eq!(grid.kind_at(Pos::new(1, 1)), k(4));

        // Empty cells stay empty when marked.
        grid.mark(Pos::new(0, 0));
        grid.mark(Pos::new(1, 1));
        assert_eq!(
            grid.clear_matched(),
            vec![(Pos::new(1, 1), TileKind::new(4))]
        );
        assert_eq!(grid.empty_positions().len(), 4);
    }

    #[test]
    fn test_swap_exchanges_cells() {
        let mut grid = Grid::from_rows(&[&[0, 1, 2]]).unwrap();
        grid.swap(Pos::new(0, 0), Pos::new(2, 0)).unwrap();
        assert_eq!(grid.kind_at(Pos::new(0, 0)), k(2));
        assert_eq!(grid.kind_at(Pos::new(2, 0)), k(0));
        assert!(grid.swap(Pos::new(0, 0), Pos::new(5, 0)).is_err());
    }

    #[test]
    fn test_clear_matched_then_collapse_preserves_order() {
        // Column 0 bottom-up: 0, 1, 2, 3
        let mut grid = Grid::from_rows(&[&[3], &[2], &[1], &[0]]).unwrap();
        grid.mark(Pos::new(0, 1));
        grid.mark(Pos::new(0, 2));

        let removed = grid.clear_matched();
        assert_eq!(
            removed,
            vec![
                (Pos::new(0, 1), TileKind::new(1)),
                (Pos::new(0, 2), TileKind::new(2))
            ]
        );

        let moves = grid.collapse();
        assert_eq!(moves, vec![(Pos::new(0, 3), Pos::new(0, 1))]);
        assert_eq!(grid.kind_at(Pos::new(0, 0)), k(0));
        assert_eq!(grid.kind_at(Pos::new(0, 1)), k(3));
        assert_eq!(grid.empty_positions(), vec![Pos::new(0, 2), Pos::new(0, 3)]);
    }

    #[test]
    fn test_write_codes() {
        let mut grid = Grid::from_rows(&[&[0, 1]]).unwrap();
        grid.set(Pos::new(1, 0), None).unwrap();
        let mut out = Vec::new();
        grid.write_codes(&mut out);
        assert_eq!(out, vec![1, 0]);
    }
}
