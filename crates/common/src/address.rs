//! Addresses: an indirection kind, a frame kind and grid coordinates.
//!
//! A `Local` address is relative to the origin of the frame that resolves
//! it; a `Global` address names an absolute grid cell. An `Indirect`
//! address names a cell that itself holds an `AddressRef`, and the effective
//! target is that inner address. Indirection is exactly one hop.

use crate::grid::GridIndex;
use std::fmt;

/// Whether an address names its target directly or through a pointer cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indirection {
    Direct,
    Indirect,
}

/// Whether an address is relative to a frame origin or absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    Local,
    Global,
}

/// A grid address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    pub indirection: Indirection,
    pub frame: Frame,
    pub coords: GridIndex,
}

impl Address {
    /// Create a new address.
    pub const fn new(indirection: Indirection, frame: Frame, coords: GridIndex) -> Self {
        Self {
            indirection,
            frame,
            coords,
        }
    }

    /// A direct, absolute address.
    pub const fn global(coords: GridIndex) -> Self {
        Self::new(Indirection::Direct, Frame::Global, coords)
    }

    /// A direct, origin-relative address.
    pub const fn local(coords: GridIndex) -> Self {
        Self::new(Indirection::Direct, Frame::Local, coords)
    }

    /// The same address, resolved through one pointer cell.
    pub const fn indirect(self) -> Self {
        Self::new(Indirection::Indirect, self.frame, self.coords)
    }

    pub fn is_indirect(&self) -> bool {
        self.indirection == Indirection::Indirect
    }

    pub fn is_global(&self) -> bool {
        self.frame == Frame::Global
    }

    /// Convert to a `Global` address relative to `origin`.
    ///
    /// Global addresses are returned unchanged. The indirection kind is
    /// always preserved.
    pub fn to_global(&self, origin: GridIndex) -> Address {
        match self.frame {
            Frame::Local => Address::new(self.indirection, Frame::Global, self.coords + origin),
            Frame::Global => *self,
        }
    }

    /// Like [`Address::to_global`], but `None` if the result leaves the
    /// `i64` coordinate range.
    pub fn checked_to_global(&self, origin: GridIndex) -> Option<Address> {
        match self.frame {
            Frame::Local => Some(Address::new(
                self.indirection,
                Frame::Global,
                self.coords.checked_add(origin)?,
            )),
            Frame::Global => Some(*self),
        }
    }

    /// Convert to a `Local` address relative to `origin`.
    ///
    /// Local addresses are returned unchanged.
    pub fn to_local(&self, origin: GridIndex) -> Address {
        match self.frame {
            Frame::Global => Address::new(self.indirection, Frame::Local, self.coords - origin),
            Frame::Local => *self,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = match self.frame {
            Frame::Local => "local",
            Frame::Global => "global",
        };
        match self.indirection {
            Indirection::Direct => write!(f, "{frame} {}", self.coords),
            Indirection::Indirect => write!(f, "*{frame} {}", self.coords),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_to_global_adds_origin() {
        let addr = Address::local(GridIndex::new(1, 2));
        let global = addr.to_global(GridIndex::new(10, 20));
        assert_eq!(global, Address::global(GridIndex::new(11, 22)));
    }

    #[test]
    fn global_to_global_is_identity() {
        let addr = Address::global(GridIndex::new(4, 4)).indirect();
        assert_eq!(addr.to_global(GridIndex::new(9, 9)), addr);
    }

    #[test]
    fn global_to_local_subtracts_origin() {
        let addr = Address::global(GridIndex::new(5, 5));
        let local = addr.to_local(GridIndex::new(2, 3));
        assert_eq!(local, Address::local(GridIndex::new(3, 2)));
    }

    #[test]
    fn checked_to_global_detects_overflow() {
        let addr = Address::local(GridIndex::new(0, i64::MAX));
        assert_eq!(addr.checked_to_global(GridIndex::new(0, 1)), None);
        assert_eq!(
            addr.checked_to_global(GridIndex::new(0, -1)),
            Some(Address::global(GridIndex::new(0, i64::MAX - 1)))
        );
        let global = Address::global(GridIndex::new(0, i64::MAX));
        assert_eq!(global.checked_to_global(GridIndex::new(5, 5)), Some(global));
    }

    #[test]
    fn local_to_local_is_identity() {
        let addr = Address::local(GridIndex::new(-1, 0));
        assert_eq!(addr.to_local(GridIndex::new(7, 7)), addr);
    }

    #[test]
    fn conversion_preserves_indirection() {
        let addr = Address::local(GridIndex::new(0, 1)).indirect();
        assert!(addr.to_global(GridIndex::new(3, 3)).is_indirect());
        assert!(addr.to_global(GridIndex::new(3, 3)).is_global());
    }

    #[test]
    fn display_marks_indirect() {
        assert_eq!(
            Address::local(GridIndex::new(0, 1)).indirect().to_string(),
            "*local (0, 1)"
        );
        assert_eq!(
            Address::global(GridIndex::new(2, 3)).to_string(),
            "global (2, 3)"
        );
    }
}
