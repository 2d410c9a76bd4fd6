//! Gesture capture.
//!
//! The user drags from a source cell to a destination cell and then picks
//! an operation. Two toggles (held modifier keys in the sandbox) decide
//! how a picked cell becomes an [`Address`]: the frame toggle chooses
//! between an address relative to the active frame and an absolute one,
//! and the indirection toggle chooses whether the operand goes through the
//! pointer stored in the cell.

use crate::error::RecordError;
use bmac_common::{Address, Frame, GridIndex, Indirection, InstrId, Operation};
use bmac_vm::VM;
use tracing::debug;

/// Pending selection plus addressing toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorder {
    frame: Frame,
    indirection: Indirection,
    src: Option<Address>,
    dst: Option<Address>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self {
            frame: Frame::Local,
            indirection: Indirection::Direct,
            src: None,
            dst: None,
        }
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Frame used for cells picked from now on.
    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    pub fn indirection(&self) -> Indirection {
        self.indirection
    }

    pub fn set_indirection(&mut self, indirection: Indirection) {
        self.indirection = indirection;
    }

    pub fn source(&self) -> Option<Address> {
        self.src
    }

    pub fn destination(&self) -> Option<Address> {
        self.dst
    }

    /// Build the address for the grid cell at `at` under the current toggles.
    pub fn pick(&self, vm: &VM, at: GridIndex) -> Address {
        let global = Address::new(self.indirection, Frame::Global, at);
        match self.frame {
            Frame::Global => global,
            Frame::Local => global.to_local(vm.current_origin()),
        }
    }

    pub fn set_src(&mut self, vm: &VM, at: GridIndex) {
        self.src = Some(self.pick(vm, at));
    }

    pub fn set_dst(&mut self, vm: &VM, at: GridIndex) {
        self.dst = Some(self.pick(vm, at));
    }

    /// Drop the pending selection.
    pub fn reset(&mut self) {
        self.src = None;
        self.dst = None;
    }

    /// Splice `op` with the pending selection at the machine's current node.
    ///
    /// The selection is cleared on success and kept on rejection so the
    /// user can pick a different operation.
    ///
    /// # Errors
    ///
    /// [`RecordError::MissingSource`]/[`RecordError::MissingDestination`]
    /// when an operand-taking operation lacks a pick, or
    /// [`RecordError::Rejected`] when the machine refuses the splice.
    pub fn record(&mut self, vm: &mut VM, op: Operation) -> Result<InstrId, RecordError> {
        let (src, dst) = match op {
            // Operand-free: any address will do.
            Operation::Nop | Operation::Return => {
                let here = Address::local(GridIndex::ORIGIN);
                (self.src.unwrap_or(here), self.dst.unwrap_or(here))
            }
            _ => (
                self.src.ok_or(RecordError::MissingSource)?,
                self.dst.ok_or(RecordError::MissingDestination)?,
            ),
        };

        match vm.splice(src, dst, op) {
            Ok(id) => {
                debug!(%op, %id, "recorded");
                self.reset();
                Ok(id)
            }
            Err(err) => {
                debug!(%op, %err, "recording rejected");
                Err(err.into())
            }
        }
    }

    /// Record `op` and execute it immediately.
    ///
    /// Returns whether the step changed the machine.
    pub fn record_and_step(&mut self, vm: &mut VM, op: Operation) -> Result<bool, RecordError> {
        self.record(vm, op)?;
        Ok(vm.execute()?)
    }

    /// Finish a drag onto `at`.
    ///
    /// Dragging the active frame's origin onto its own code cell is the
    /// shortcut for returning: `Return` is recorded and executed at once,
    /// and `Some` carries the step result. Any other drop only sets the
    /// destination and yields `None`.
    pub fn on_drop(&mut self, vm: &mut VM, at: GridIndex) -> Result<Option<bool>, RecordError> {
        self.set_dst(vm, at);
        let (Some(src), Some(dst)) = (self.src, self.dst) else {
            return Ok(None);
        };
        let origin = vm.current_origin();
        if src.to_global(origin).coords == origin
            && dst.to_global(origin).coords == vm.current_target()
        {
            return self.record_and_step(vm, Operation::Return).map(Some);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toggles() {
        let recorder = Recorder::new();
        assert_eq!(recorder.frame(), Frame::Local);
        assert_eq!(recorder.indirection(), Indirection::Direct);
        assert_eq!(recorder.source(), None);
        assert_eq!(recorder.destination(), None);
    }

    #[test]
    fn pick_respects_toggles() {
        let vm = VM::new();
        let mut recorder = Recorder::new();
        let at = GridIndex::new(2, 3);
        assert_eq!(recorder.pick(&vm, at), Address::local(at));

        recorder.set_frame(Frame::Global);
        assert_eq!(recorder.pick(&vm, at), Address::global(at));

        recorder.set_indirection(Indirection::Indirect);
        assert_eq!(recorder.pick(&vm, at), Address::global(at).indirect());
    }

    #[test]
    fn reset_clears_selection() {
        let vm = VM::new();
        let mut recorder = Recorder::new();
        recorder.set_src(&vm, GridIndex::new(0, 1));
        recorder.set_dst(&vm, GridIndex::new(0, 2));
        assert!(recorder.source().is_some());
        recorder.reset();
        assert_eq!(recorder.source(), None);
        assert_eq!(recorder.destination(), None);
    }
}
