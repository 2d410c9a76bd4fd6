//! bmac virtual machine: executes self-modifying programs laid out on an
//! unbounded grid.
//!
//! The machine has:
//! - A sparse grid of cells shared by code and data
//! - An arena of instruction nodes forming a mutable, possibly cyclic graph
//! - A context stack that doubles as the return-address mechanism
//! - A tri-state comparison flag set by branches
//!
//! # Usage
//!
//! ```
//! use bmac_common::{Address, Cell, GridIndex, Operation};
//! use bmac_vm::{run, VM};
//!
//! let mut vm = VM::new();
//! let a = Address::local(GridIndex::new(0, 1));
//! let b = Address::local(GridIndex::new(0, 2));
//! vm.write(&a, Cell::Data(5.0)).unwrap();
//! vm.write(&b, Cell::Data(3.0)).unwrap();
//!
//! vm.splice(a, b, Operation::Add).unwrap();
//! assert_eq!(run(&mut vm, 100), Ok(1));
//! assert_eq!(vm.read(&b), Ok(Some(Cell::Data(8.0))));
//! ```

pub mod context;
pub mod error;
pub mod execute;
pub mod looper;
pub mod machine;
pub mod memory;
pub mod splice;

pub use context::{ContextStack, ExecutionContext};
pub use error::{AuthoringError, VmTrap};
pub use looper::{Looper, LooperConfig};
pub use machine::VM;
pub use memory::{resolve, GridMemory};

/// Execute until the machine halts or `max_steps` transitions have run.
///
/// Returns the number of transitions. A program that loops forever keeps
/// running until the bound.
///
/// # Errors
///
/// Returns the first [`VmTrap`]; the machine is left as of the last
/// successful step.
pub fn run(vm: &mut VM, max_steps: usize) -> Result<usize, VmTrap> {
    let mut steps = 0;
    while steps < max_steps && vm.execute()? {
        steps += 1;
    }
    Ok(steps)
}
