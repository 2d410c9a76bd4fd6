//! bmac common types.
//!
//! This crate provides the value types shared by the machine and the
//! recorder:
//!
//! - [`GridIndex`]: signed (row, column) coordinates
//! - [`Address`]: indirection + frame + coordinates, with local/global conversion
//! - [`Cell`]: `Data`, `AddressRef` or `Code`
//! - [`Instruction`]: one node of the program graph
//! - [`InstructionGraph`] / [`InstrId`]: the arena that owns every node
//! - [`Operation`]: the flat catalogue of recordable operations
//!
//! # Dependencies
//!
//! This crate uses `thiserror` and has no other dependencies.

pub mod address;
pub mod cell;
pub mod error;
pub mod graph;
pub mod grid;
pub mod instruction;
pub mod operation;

// Re-export commonly used types at the crate root.
pub use address::{Address, Frame, Indirection};
pub use cell::Cell;
pub use error::ParseOperationError;
pub use graph::{InstrId, InstructionGraph};
pub use grid::GridIndex;
pub use instruction::{Comparison, DataOp, Instruction};
pub use operation::{Operation, ALL_OPERATIONS};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_index() -> impl Strategy<Value = GridIndex> {
        (-1_000_000i64..1_000_000, -1_000_000i64..1_000_000)
            .prop_map(|(row, col)| GridIndex::new(row, col))
    }

    fn arb_indirection() -> impl Strategy<Value = Indirection> {
        prop_oneof![Just(Indirection::Direct), Just(Indirection::Indirect)]
    }

    proptest! {
        /// Converting a local address to global and back is lossless.
        #[test]
        fn local_global_roundtrip(
            coords in arb_index(),
            origin in arb_index(),
            indirection in arb_indirection(),
        ) {
            let addr = Address::new(indirection, Frame::Local, coords);
            prop_assert_eq!(addr.to_global(origin).to_local(origin), addr);
        }

        /// Converting a global address to local and back is lossless.
        #[test]
        fn global_local_roundtrip(
            coords in arb_index(),
            origin in arb_index(),
            indirection in arb_indirection(),
        ) {
            let addr = Address::new(indirection, Frame::Global, coords);
            prop_assert_eq!(addr.to_local(origin).to_global(origin), addr);
        }

        /// Global coordinates never depend on which frame produced them.
        #[test]
        fn to_global_is_idempotent(coords in arb_index(), a in arb_index(), b in arb_index()) {
            let global = Address::local(coords).to_global(a);
            prop_assert_eq!(global.to_global(b), global);
        }

        #[test]
        fn mnemonic_parse_roundtrip(op in prop::sample::select(&ALL_OPERATIONS[..])) {
            prop_assert_eq!(op.mnemonic().parse::<Operation>(), Ok(op));
        }
    }
}
