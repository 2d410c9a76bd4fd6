//! bmac recorder: turns user gestures into instruction splices.
//!
//! A [`Recorder`] keeps the cells the user picked and the addressing
//! toggles, and hands them to [`bmac_vm::VM::splice`] together with the
//! chosen operation. It also answers which cells the grid view should
//! highlight.
//!
//! # Usage
//!
//! ```
//! use bmac_common::{Address, Cell, GridIndex, Operation};
//! use bmac_recorder::Recorder;
//! use bmac_vm::VM;
//!
//! let mut vm = VM::new();
//! vm.write(&Address::global(GridIndex::new(0, 1)), Cell::Data(5.0)).unwrap();
//!
//! let mut recorder = Recorder::new();
//! recorder.set_src(&vm, GridIndex::new(0, 1));
//! recorder.set_dst(&vm, GridIndex::new(0, 2));
//! assert_eq!(recorder.record_and_step(&mut vm, Operation::Move), Ok(true));
//! assert_eq!(vm.memory().read_at(GridIndex::new(0, 2)), Some(Cell::Data(5.0)));
//! ```

pub mod error;
pub mod highlight;
pub mod recorder;

pub use error::RecordError;
pub use highlight::Highlight;
pub use recorder::Recorder;
