//! Cell highlighting for the grid view.

use crate::recorder::Recorder;
use bmac_common::{Address, GridIndex};
use bmac_vm::VM;

/// How a grid cell should be emphasised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// The active frame's origin or code cell.
    ActiveFrame,
    /// The pending source pick, or the last step's first operand.
    Source,
    /// The pending destination pick, or the last step's second operand.
    Destination,
    None,
}

impl Recorder {
    /// Classify the cell at `at`. Earlier variants win.
    pub fn highlight(&self, vm: &VM, at: GridIndex) -> Highlight {
        if at == vm.current_origin() || at == vm.current_target() {
            return Highlight::ActiveFrame;
        }

        let origin = vm.current_origin();
        let names = |addr: Option<Address>| addr.is_some_and(|a| a.to_global(origin).coords == at);
        let previous = vm.previous_instruction();

        if names(self.source()) || names(previous.and_then(|i| i.source())) {
            Highlight::Source
        } else if names(self.destination()) || names(previous.and_then(|i| i.destination())) {
            Highlight::Destination
        } else {
            Highlight::None
        }
    }
}
