//! Instruction nodes.
//!
//! Every instruction owns the handles of its successor nodes, so a program
//! is a directed graph that may contain cycles. Nodes live in an
//! [`InstructionGraph`](crate::InstructionGraph) and are overwritten in
//! place when the program is edited.

use crate::address::Address;
use crate::graph::InstrId;
use crate::operation::Operation;

/// Single-successor operations that move or combine cell contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataOp {
    AddressOf,
    Shift,
    Read,
    Write,
    Move,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl DataOp {
    pub fn operation(&self) -> Operation {
        match self {
            DataOp::AddressOf => Operation::AddressOf,
            DataOp::Shift => Operation::Shift,
            DataOp::Read => Operation::Read,
            DataOp::Write => Operation::Write,
            DataOp::Move => Operation::Move,
            DataOp::Add => Operation::Add,
            DataOp::Subtract => Operation::Subtract,
            DataOp::Multiply => Operation::Multiply,
            DataOp::Divide => Operation::Divide,
            DataOp::Modulo => Operation::Modulo,
        }
    }

    /// True for the five operations that combine two `Data` cells.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            DataOp::Add | DataOp::Subtract | DataOp::Multiply | DataOp::Divide | DataOp::Modulo
        )
    }
}

/// Conditional branch predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Equal,
    LessThan,
}

impl Comparison {
    /// Evaluate the predicate on two numeric values.
    pub fn holds(&self, left: f64, right: f64) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::LessThan => left < right,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Comparison::Equal => Operation::BranchIfEqual,
            Comparison::LessThan => Operation::BranchIfLessThan,
        }
    }
}

/// One node of the instruction graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Halt/idle. Executing it changes nothing.
    Nop,
    Data {
        op: DataOp,
        src: Address,
        dst: Address,
        next: InstrId,
    },
    Branch {
        cmp: Comparison,
        left: Address,
        right: Address,
        if_true: InstrId,
        if_false: InstrId,
    },
    /// Push a frame for the function at `target`; the caller resumes at `link`.
    Call {
        target: Address,
        origin: Address,
        link: InstrId,
    },
    /// Retarget the active frame to the function at `target`.
    Jump { target: Address, origin: Address },
    Return,
}

impl Instruction {
    /// The operation this node performs.
    pub fn operation(&self) -> Operation {
        match self {
            Instruction::Nop => Operation::Nop,
            Instruction::Data { op, .. } => op.operation(),
            Instruction::Branch { cmp, .. } => cmp.operation(),
            Instruction::Call { .. } => Operation::CallWithLink,
            Instruction::Jump { .. } => Operation::Jump,
            Instruction::Return => Operation::Return,
        }
    }

    pub fn is_nop(&self) -> bool {
        matches!(self, Instruction::Nop)
    }

    /// The first operand: `src`, `left` or `target`.
    pub fn source(&self) -> Option<Address> {
        match self {
            Instruction::Data { src, .. } => Some(*src),
            Instruction::Branch { left, .. } => Some(*left),
            Instruction::Call { target, .. } | Instruction::Jump { target, .. } => Some(*target),
            Instruction::Nop | Instruction::Return => None,
        }
    }

    /// The second operand: `dst`, `right` or `origin`.
    pub fn destination(&self) -> Option<Address> {
        match self {
            Instruction::Data { dst, .. } => Some(*dst),
            Instruction::Branch { right, .. } => Some(*right),
            Instruction::Call { origin, .. } | Instruction::Jump { origin, .. } => Some(*origin),
            Instruction::Nop | Instruction::Return => None,
        }
    }

    /// Successor handles in the order `next`, `if_true`, `if_false`, `link`.
    pub fn successors(&self) -> Vec<InstrId> {
        match self {
            Instruction::Data { next, .. } => vec![*next],
            Instruction::Branch {
                if_true, if_false, ..
            } => vec![*if_true, *if_false],
            Instruction::Call { link, .. } => vec![*link],
            Instruction::Nop | Instruction::Jump { .. } | Instruction::Return => Vec::new(),
        }
    }
}
