//! Errors raised by the bmac machine.
//!
//! A [`VmTrap`] is fatal for the step that raised it: the instruction is
//! abandoned before any state changes and the driver should stop ticking.
//! An [`AuthoringError`] rejects a splice and leaves the program unchanged.

use bmac_common::{GridIndex, InstrId};
use thiserror::Error;

/// Invariant violations discovered while executing a committed instruction.
///
/// Cell-related variants carry the global coordinate of the offending cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmTrap {
    /// An indirect hop or pointer operation found something other than an `AddressRef`.
    #[error("cell at {at} does not hold an address")]
    NotAnAddressCell { at: GridIndex },

    /// An operand that must hold a value was empty.
    #[error("cell at {at} is empty")]
    EmptyCell { at: GridIndex },

    /// An arithmetic or branch operand held something other than `Data`.
    #[error("cell at {at} does not hold data")]
    NotDataCell { at: GridIndex },

    /// Divisor (floored, for modulo) was zero.
    #[error("division by zero at {at}")]
    DivisionByZero { at: GridIndex },

    /// An address computed from `at` falls outside the `i64` coordinate range.
    ///
    /// `at` is the pointer cell, or the local offset when the frame origin
    /// itself pushes the address out of range.
    #[error("address computed from {at} is out of range")]
    AddressOutOfRange { at: GridIndex },

    /// A pointer shift amount was NaN or infinite.
    #[error("shift amount at {at} is not finite")]
    NonFiniteShift { at: GridIndex },

    /// RET with only the root context on the stack.
    #[error("RET with only the root context")]
    ReturnFromRoot,

    /// The active frame points at a node that is not in this machine's graph.
    #[error("unknown instruction {id}")]
    UnknownInstruction { id: InstrId },
}

/// Reasons a requested splice was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthoringError {
    /// The operation needs a value at this operand.
    #[error("operand at {at} is empty")]
    EmptyOperand { at: GridIndex },

    #[error("operand at {at} must hold data")]
    ExpectedData { at: GridIndex },

    #[error("operand at {at} must hold an address")]
    ExpectedAddress { at: GridIndex },

    /// Call targets must be empty (lazily defined) or already hold code.
    #[error("call target at {at} must be empty or hold code")]
    ExpectedCodeOrEmpty { at: GridIndex },

    #[error("RET cannot be recorded in the root context")]
    ReturnFromRoot,

    /// An indirect operand could not be resolved.
    #[error("unresolved operand: {0}")]
    UnresolvedOperand(#[from] VmTrap),
}
