//! Call frames and the context stack.
//!
//! There is no separate return-address stack: a call stores its resume
//! point in the caller's `current` before pushing the callee, so popping a
//! frame is the whole of a return.

use bmac_common::{GridIndex, InstrId};

/// One call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Offset applied to `Local` addresses in this frame.
    pub origin: GridIndex,
    /// Global coordinate of this frame's own `Code` cell.
    pub target: GridIndex,
    /// The instruction this frame runs next.
    pub current: InstrId,
    /// The instruction that produced the last transition in this frame.
    pub previous: Option<InstrId>,
}

impl ExecutionContext {
    /// A fresh frame about to run `entry`.
    pub fn new(origin: GridIndex, target: GridIndex, entry: InstrId) -> Self {
        Self {
            origin,
            target,
            current: entry,
            previous: None,
        }
    }

    /// Move to `next`, remembering the instruction just executed.
    pub fn advance(&mut self, next: InstrId) {
        self.previous = Some(self.current);
        self.current = next;
    }
}

/// A stack of frames that always holds at least the root frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextStack {
    root: ExecutionContext,
    frames: Vec<ExecutionContext>,
}

impl ContextStack {
    pub fn new(root: ExecutionContext) -> Self {
        Self {
            root,
            frames: Vec::new(),
        }
    }

    /// The active frame.
    pub fn top(&self) -> &ExecutionContext {
        self.frames.last().unwrap_or(&self.root)
    }

    pub fn top_mut(&mut self) -> &mut ExecutionContext {
        self.frames.last_mut().unwrap_or(&mut self.root)
    }

    pub fn push(&mut self, frame: ExecutionContext) {
        self.frames.push(frame);
    }

    /// Pop the active frame. Returns `None`, leaving the stack untouched,
    /// when only the root remains.
    pub fn pop(&mut self) -> Option<ExecutionContext> {
        self.frames.pop()
    }

    /// Number of frames, root included. Never zero.
    pub fn depth(&self) -> usize {
        self.frames.len() + 1
    }

    /// Frames from the root to the active one.
    pub fn iter(&self) -> impl Iterator<Item = &ExecutionContext> {
        std::iter::once(&self.root).chain(self.frames.iter())
    }
}
