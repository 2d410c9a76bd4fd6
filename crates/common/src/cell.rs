//! Grid cell contents.
//!
//! An absent cell is represented by `Option<Cell>::None` at the storage
//! layer; it is distinct from `Data(0.0)`.

use crate::address::Address;
use crate::graph::InstrId;

/// The content of one grid location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// A scalar.
    Data(f64),
    /// A pointer to another cell.
    AddressRef(Address),
    /// The entry point of a callable function.
    Code { entry: InstrId },
}

impl Cell {
    pub fn as_data(&self) -> Option<f64> {
        match self {
            Cell::Data(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Cell::AddressRef(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<InstrId> {
        match self {
            Cell::Code { entry } => Some(*entry),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Cell::Data(_))
    }

    pub fn is_address(&self) -> bool {
        matches!(self, Cell::AddressRef(_))
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Cell::Code { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridIndex;
    use crate::graph::InstructionGraph;

    #[test]
    fn accessors_match_variant() {
        let data = Cell::Data(2.5);
        assert_eq!(data.as_data(), Some(2.5));
        assert_eq!(data.as_address(), None);
        assert!(data.is_data());

        let addr = Address::global(GridIndex::new(1, 1));
        let ptr = Cell::AddressRef(addr);
        assert_eq!(ptr.as_address(), Some(addr));
        assert_eq!(ptr.as_data(), None);
        assert!(ptr.is_address());

        let mut graph = InstructionGraph::new();
        let entry = graph.alloc_nop();
        let code = Cell::Code { entry };
        assert_eq!(code.as_code(), Some(entry));
        assert!(code.is_code());
        assert!(!code.is_data());
    }

    #[test]
    fn data_zero_is_not_address() {
        assert_ne!(
            Cell::Data(0.0),
            Cell::AddressRef(Address::global(GridIndex::ORIGIN))
        );
    }
}
