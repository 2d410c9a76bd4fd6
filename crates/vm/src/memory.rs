//! Sparse grid storage and address resolution.
//!
//! [`GridMemory`] knows nothing about addressing modes; [`resolve`] layers
//! the local/global and direct/indirect rules on top of it.

use crate::error::VmTrap;
use bmac_common::{Address, Cell, GridIndex, Indirection};
use std::collections::HashMap;

/// Unbounded two-dimensional cell store.
///
/// Untouched coordinates read as empty. Writing never fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridMemory {
    cells: HashMap<GridIndex, Cell>,
}

impl GridMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell at `at`, or `None` if it was never written.
    pub fn read_at(&self, at: GridIndex) -> Option<Cell> {
        self.cells.get(&at).copied()
    }

    pub fn write_at(&mut self, at: GridIndex, cell: Cell) {
        self.cells.insert(at, cell);
    }

    /// Empty a cell, returning what it held.
    pub fn clear_at(&mut self, at: GridIndex) -> Option<Cell> {
        self.cells.remove(&at)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (GridIndex, &Cell)> {
        self.cells.iter().map(|(at, cell)| (*at, cell))
    }
}

impl FromIterator<(GridIndex, Cell)> for GridMemory {
    fn from_iter<I: IntoIterator<Item = (GridIndex, Cell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Resolve `addr` to the global coordinate it designates.
///
/// `origin` is the origin of the resolving frame. An indirect address takes
/// exactly one hop through the `AddressRef` it names; a `Local` inner
/// address is interpreted against the same `origin`. Coordinates that
/// overflow `i64` trap with [`VmTrap::AddressOutOfRange`].
pub fn resolve(addr: &Address, origin: GridIndex, memory: &GridMemory) -> Result<GridIndex, VmTrap> {
    let at = addr
        .checked_to_global(origin)
        .ok_or(VmTrap::AddressOutOfRange { at: addr.coords })?
        .coords;
    match addr.indirection {
        Indirection::Direct => Ok(at),
        Indirection::Indirect => match memory.read_at(at) {
            Some(Cell::AddressRef(inner)) => inner
                .checked_to_global(origin)
                .map(|a| a.coords)
                .ok_or(VmTrap::AddressOutOfRange { at }),
            _ => Err(VmTrap::NotAnAddressCell { at }),
        },
    }
}
