//! Errors for parsing operation mnemonics.

use thiserror::Error;

/// A mnemonic did not name any known operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation mnemonic: {0:?}")]
pub struct ParseOperationError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_mnemonic() {
        assert_eq!(
            ParseOperationError("JMP".into()).to_string(),
            "unknown operation mnemonic: \"JMP\""
        );
    }
}
