//! Grid coordinates and neighbourhood iteration
//!
//! All per-cell arrays are stored row-major (`row * cols + col`). Transfer uses
//! the 4-neighbourhood, componentization uses the 8-neighbourhood.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offsets of the 4-connected neighbourhood (up, down, left, right)
pub const NEIGHBORS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Offsets of the 8-connected neighbourhood (4-neighbourhood plus diagonals)
pub const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A `(row, col)` cell coordinate, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into a grid `cols` wide
    #[inline]
    #[must_use]
    pub const fn index(self, cols: usize) -> usize {
        self.row * cols + self.col
    }

    /// Inverse of [`GridCoord::index`]
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize, cols: usize) -> Self {
        Self {
            row: index / cols,
            col: index % cols,
        }
    }

    /// Whether the coordinate lies inside a `rows × cols` grid
    #[inline]
    #[must_use]
    pub const fn in_bounds(self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }

    /// Coordinate shifted by `(d_row, d_col)`, or `None` if it leaves the grid
    #[inline]
    #[must_use]
    pub fn offset(self, d_row: isize, d_col: isize, rows: usize, cols: usize) -> Option<Self> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        let shifted = Self { row, col };
        shifted.in_bounds(rows, cols).then_some(shifted)
    }

    /// In-bounds 4-connected neighbours in up, down, left, right order
    pub fn neighbors_4(self, rows: usize, cols: usize) -> impl Iterator<Item = GridCoord> {
        NEIGHBORS_4
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc, rows, cols))
    }

    /// In-bounds 8-connected neighbours
    pub fn neighbors_8(self, rows: usize, cols: usize) -> impl Iterator<Item = GridCoord> {
        NEIGHBORS_8
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc, rows, cols))
    }
}

impl From<(usize, usize)> for GridCoord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip_is_row_major() {
        let c = GridCoord::new(2, 3);
        assert_eq!(c.index(10), 23);
        assert_eq!(GridCoord::from_index(23, 10), c);
    }

    #[test]
    fn test_corner_has_two_and_three_neighbors() {
        let corner = GridCoord::new(0, 0);
        let n4: Vec<_> = corner.neighbors_4(3, 3).collect();
        assert_eq!(n4, vec![GridCoord::new(1, 0), GridCoord::new(0, 1)]);
        assert_eq!(corner.neighbors_8(3, 3).count(), 3);
    }

    #[test]
    fn test_interior_neighbor_counts() {
        let center = GridCoord::new(1, 1);
        assert_eq!(center.neighbors_4(3, 3).count(), 4);
        assert_eq!(center.neighbors_8(3, 3).count(), 8);
    }

    #[test]
    fn test_offset_rejects_out_of_grid() {
        let c = GridCoord::new(0, 4);
        assert_eq!(c.offset(-1, 0, 5, 5), None);
        assert_eq!(c.offset(0, 1, 5, 5), None);
        assert_eq!(c.offset(1, -1, 5, 5), Some(GridCoord::new(1, 3)));
    }
}
