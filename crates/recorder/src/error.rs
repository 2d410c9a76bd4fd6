//! Errors reported to the user while recording.

use bmac_vm::{AuthoringError, VmTrap};
use thiserror::Error;

/// Why a recording gesture did not produce a step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The operation needs a source cell and none was picked.
    #[error("no source cell picked")]
    MissingSource,

    /// The operation needs a destination cell and none was picked.
    #[error("no destination cell picked")]
    MissingDestination,

    /// The machine refused the splice; the program is unchanged.
    #[error("rejected: {0}")]
    Rejected(#[from] AuthoringError),

    /// The splice succeeded but executing it trapped.
    #[error("trapped: {0}")]
    Trapped(#[from] VmTrap),
}
