//! The instruction arena.
//!
//! Nodes are addressed by stable integer handles. A handle stays valid for
//! the lifetime of the graph; nodes are never freed, only overwritten in
//! place. Many instructions and many `Code` cells may share one handle,
//! and edges may point backwards to form loops.

use crate::instruction::Instruction;
use std::fmt;

/// Handle of a node in an [`InstructionGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstrId(usize);

impl InstrId {
    /// Position of the node in its arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Arena of instruction nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionGraph {
    nodes: Vec<Instruction>,
}

impl InstructionGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its handle.
    pub fn alloc(&mut self, instruction: Instruction) -> InstrId {
        let id = InstrId(self.nodes.len());
        self.nodes.push(instruction);
        id
    }

    /// Add a fresh `Nop` placeholder.
    pub fn alloc_nop(&mut self) -> InstrId {
        self.alloc(Instruction::Nop)
    }

    /// Look up a node. `None` only for handles from another graph.
    pub fn get(&self, id: InstrId) -> Option<&Instruction> {
        self.nodes.get(id.0)
    }

    /// Overwrite a node in place, returning its previous content.
    ///
    /// Every holder of `id` observes the new instruction.
    pub fn replace(&mut self, id: InstrId, instruction: Instruction) -> Option<Instruction> {
        self.nodes
            .get_mut(id.0)
            .map(|slot| std::mem::replace(slot, instruction))
    }

    pub fn contains(&self, id: InstrId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Number of nodes ever allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
