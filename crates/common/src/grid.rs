//! Grid coordinates.
//!
//! The grid is unbounded in every direction, so both components are signed.
//! Arithmetic is coordinate-wise. The `+`/`-` operators wrap at the `i64`
//! boundary; the machine uses [`GridIndex::checked_add`] and
//! [`GridIndex::checked_sub`] wherever an address is resolved.

use std::fmt;
use std::ops::{Add, Sub};

/// A (row, column) position on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct GridIndex {
    pub row: i64,
    pub col: i64,
}

impl GridIndex {
    /// The grid origin `(0, 0)`.
    pub const ORIGIN: GridIndex = GridIndex { row: 0, col: 0 };

    /// Create a new grid index.
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Coordinate-wise sum, or `None` if either component overflows.
    pub fn checked_add(self, rhs: GridIndex) -> Option<GridIndex> {
        Some(GridIndex::new(
            self.row.checked_add(rhs.row)?,
            self.col.checked_add(rhs.col)?,
        ))
    }

    /// Coordinate-wise difference, or `None` if either component overflows.
    pub fn checked_sub(self, rhs: GridIndex) -> Option<GridIndex> {
        Some(GridIndex::new(
            self.row.checked_sub(rhs.row)?,
            self.col.checked_sub(rhs.col)?,
        ))
    }
}

impl Add for GridIndex {
    type Output = GridIndex;

    fn add(self, rhs: GridIndex) -> GridIndex {
        GridIndex::new(self.row.wrapping_add(rhs.row), self.col.wrapping_add(rhs.col))
    }
}

impl Sub for GridIndex {
    type Output = GridIndex;

    fn sub(self, rhs: GridIndex) -> GridIndex {
        GridIndex::new(self.row.wrapping_sub(rhs.row), self.col.wrapping_sub(rhs.col))
    }
}

impl From<(i64, i64)> for GridIndex {
    fn from((row, col): (i64, i64)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
