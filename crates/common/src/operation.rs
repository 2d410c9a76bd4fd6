//! The closed catalogue of operations a user can record.
//!
//! `Operation` is flat: it names every instruction kind, including the
//! sub-kinds that [`Instruction`](crate::Instruction) groups under
//! `Data` and `Branch`.

use crate::error::ParseOperationError;
use crate::instruction::{Comparison, DataOp};
use std::fmt;
use std::str::FromStr;

/// Identifies the operation an instruction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// No operation. Reaching one halts the machine.
    Nop,

    // Pointers
    /// Store a pointer to `src` at `dst`.
    AddressOf,
    /// Move the pointer at `dst` right by the value at `src`.
    Shift,
    /// Load through the pointer at `src` into `dst`.
    Read,
    /// Store `src` through the pointer at `dst`.
    Write,

    // Data
    /// Copy `src` to `dst`.
    Move,
    /// `dst = dst + src`.
    Add,
    /// `dst = dst - src`.
    Subtract,
    /// `dst = dst * src`.
    Multiply,
    /// `dst = dst / src`, truncated toward zero.
    Divide,
    /// `dst = dst % floor(src)`.
    Modulo,

    // Control flow
    /// Branch on numeric equality of two data cells.
    BranchIfEqual,
    /// Branch on `left < right`.
    BranchIfLessThan,
    /// Call the function at `target` in a new frame, resume at `link`.
    CallWithLink,
    /// Transfer the active frame to the function at `target`.
    Jump,
    /// Pop the active frame.
    Return,
}

/// All operations, in definition order.
pub const ALL_OPERATIONS: [Operation; 16] = [
    Operation::Nop,
    Operation::AddressOf,
    Operation::Shift,
    Operation::Read,
    Operation::Write,
    Operation::Move,
    Operation::Add,
    Operation::Subtract,
    Operation::Multiply,
    Operation::Divide,
    Operation::Modulo,
    Operation::BranchIfEqual,
    Operation::BranchIfLessThan,
    Operation::CallWithLink,
    Operation::Jump,
    Operation::Return,
];

impl Operation {
    /// Returns the short mnemonic for this operation.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Operation::Nop => "NOP",
            Operation::AddressOf => "PTR",
            Operation::Shift => "INC",
            Operation::Read => "RD",
            Operation::Write => "WR",
            Operation::Move => "MOV",
            Operation::Add => "ADD",
            Operation::Subtract => "SUB",
            Operation::Multiply => "MUL",
            Operation::Divide => "DIV",
            Operation::Modulo => "MOD",
            Operation::BranchIfEqual => "BEQ",
            Operation::BranchIfLessThan => "BLT",
            Operation::CallWithLink => "BL",
            Operation::Jump => "B",
            Operation::Return => "RET",
        }
    }

    /// The data sub-kind, if this is a single-successor data operation.
    pub fn data_op(&self) -> Option<DataOp> {
        match self {
            Operation::AddressOf => Some(DataOp::AddressOf),
            Operation::Shift => Some(DataOp::Shift),
            Operation::Read => Some(DataOp::Read),
            Operation::Write => Some(DataOp::Write),
            Operation::Move => Some(DataOp::Move),
            Operation::Add => Some(DataOp::Add),
            Operation::Subtract => Some(DataOp::Subtract),
            Operation::Multiply => Some(DataOp::Multiply),
            Operation::Divide => Some(DataOp::Divide),
            Operation::Modulo => Some(DataOp::Modulo),
            _ => None,
        }
    }

    /// The comparison, if this is a conditional branch.
    pub fn comparison(&self) -> Option<Comparison> {
        match self {
            Operation::BranchIfEqual => Some(Comparison::Equal),
            Operation::BranchIfLessThan => Some(Comparison::LessThan),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Operation {
    type Err = ParseOperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OPERATIONS
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseOperationError(s.to_string()))
    }
}
