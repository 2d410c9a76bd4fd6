//! VM state: grid memory, instruction graph, context stack and the
//! comparison flag.

use crate::context::{ContextStack, ExecutionContext};
use crate::error::VmTrap;
use crate::memory::{resolve, GridMemory};
use bmac_common::{Address, Cell, GridIndex, InstrId, Instruction, InstructionGraph};
use tracing::debug;

/// The bmac virtual machine.
///
/// One instance owns everything a running program can touch. The driver
/// and the authoring surface must never use it concurrently.
#[derive(Debug, Clone)]
pub struct VM {
    /// Code and data.
    pub(crate) memory: GridMemory,
    /// Every instruction node ever created.
    pub(crate) graph: InstructionGraph,
    /// Call frames; the root frame has origin `(0, 0)`.
    pub(crate) contexts: ContextStack,
    /// Tri-state comparison flag: set by branches, cleared by everything else.
    pub(crate) flag: Option<bool>,
}

impl Default for VM {
    fn default() -> Self {
        Self::new()
    }
}

impl VM {
    /// Create a machine with an empty grid.
    pub fn new() -> Self {
        Self::with_memory(GridMemory::new())
    }

    /// Create a machine over pre-seeded memory.
    ///
    /// The root function cell at `(0, 0)` is (re)written as `Code` whose
    /// entry is the root frame's first instruction, a `Nop`.
    pub fn with_memory(mut memory: GridMemory) -> Self {
        let mut graph = InstructionGraph::new();
        let entry = graph.alloc_nop();
        memory.write_at(GridIndex::ORIGIN, Cell::Code { entry });
        let root = ExecutionContext::new(GridIndex::ORIGIN, GridIndex::ORIGIN, entry);
        Self {
            memory,
            graph,
            contexts: ContextStack::new(root),
            flag: None,
        }
    }

    pub fn memory(&self) -> &GridMemory {
        &self.memory
    }

    pub fn graph(&self) -> &InstructionGraph {
        &self.graph
    }

    /// Direct access to the graph for rewiring edges (loops, shared tails).
    pub fn graph_mut(&mut self) -> &mut InstructionGraph {
        &mut self.graph
    }

    pub fn contexts(&self) -> &ContextStack {
        &self.contexts
    }

    /// The active frame.
    pub fn current_context(&self) -> &ExecutionContext {
        self.contexts.top()
    }

    /// Number of frames on the stack, never less than 1.
    pub fn depth(&self) -> usize {
        self.contexts.depth()
    }

    pub fn current_origin(&self) -> GridIndex {
        self.contexts.top().origin
    }

    pub fn current_target(&self) -> GridIndex {
        self.contexts.top().target
    }

    /// Handle of the instruction the active frame runs next.
    pub fn current_instruction_id(&self) -> InstrId {
        self.contexts.top().current
    }

    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.graph.get(self.current_instruction_id())
    }

    /// The instruction that produced the active frame's last transition.
    pub fn previous_instruction(&self) -> Option<&Instruction> {
        self.contexts
            .top()
            .previous
            .and_then(|id| self.graph.get(id))
    }

    /// `Some(true)`/`Some(false)` right after a branch, `None` otherwise.
    pub fn flag(&self) -> Option<bool> {
        self.flag
    }

    /// True when the next `execute()` would be a `Nop`.
    pub fn is_halted(&self) -> bool {
        self.current_instruction().is_none_or(Instruction::is_nop)
    }

    /// Resolve an address against the active frame's origin.
    pub fn resolve(&self, addr: &Address) -> Result<GridIndex, VmTrap> {
        resolve(addr, self.current_origin(), &self.memory)
    }

    /// Read the cell an address designates in the active frame.
    pub fn read(&self, addr: &Address) -> Result<Option<Cell>, VmTrap> {
        let at = self.resolve(addr)?;
        Ok(self.memory.read_at(at))
    }

    /// Write the cell an address designates in the active frame.
    pub fn write(&mut self, addr: &Address, cell: Cell) -> Result<(), VmTrap> {
        let at = self.resolve(addr)?;
        self.memory.write_at(at, cell);
        Ok(())
    }

    /// Fetch the active frame's instruction.
    pub(crate) fn fetch(&self) -> Result<Instruction, VmTrap> {
        let id = self.current_instruction_id();
        self.graph
            .get(id)
            .copied()
            .ok_or(VmTrap::UnknownInstruction { id })
    }

    /// The entry of the function at `at`, defining an empty one if the
    /// cell does not hold code yet.
    pub(crate) fn define_function(&mut self, at: GridIndex) -> InstrId {
        if let Some(Cell::Code { entry }) = self.memory.read_at(at) {
            return entry;
        }
        let entry = self.graph.alloc_nop();
        self.memory.write_at(at, Cell::Code { entry });
        debug!(%at, %entry, "defined empty function");
        entry
    }

    /// The global coordinate the pointer stored at `at` designates from the
    /// active frame.
    pub(crate) fn pointee(&self, ptr: &Address, at: GridIndex) -> Result<GridIndex, VmTrap> {
        ptr.checked_to_global(self.current_origin())
            .map(|a| a.coords)
            .ok_or(VmTrap::AddressOutOfRange { at })
    }
}
