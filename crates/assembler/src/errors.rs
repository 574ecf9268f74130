//! Structured error reporting for assembler phases.
//!
//! Every failure carries the 1-indexed source line it was detected on.
//! Assembly is fail-fast: callers get either a complete word sequence or
//! the first error, formatted in the standard style:
//!
//! ```text
//! line 3: unknown mnemonic 'FOO'
//! ```

use std::fmt;

/// An assembly error with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleError {
    /// 1-indexed source line number.
    pub line: usize,
    /// The kind of error.
    pub kind: AssembleErrorKind,
}

impl AssembleError {
    /// Creates a new error at the given source line.
    #[must_use]
    pub const fn new(line: usize, kind: AssembleErrorKind) -> Self {
        Self { line, kind }
    }
}

impl fmt::Display for AssembleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for AssembleError {}

/// Classification of assembly errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssembleErrorKind {
    /// The mnemonic resolves against neither opcode table.
    UnknownMnemonic(String),
    /// The operand token is neither a known label nor parseable hex.
    InvalidOperand(String),
}

impl fmt::Display for AssembleErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMnemonic(m) => write!(f, "unknown mnemonic '{m}'"),
            Self::InvalidOperand(t) => write!(f, "invalid operand '{t}'"),
        }
    }
}

/// Result type for assembler operations.
pub type AssembleResult<T> = Result<T, AssembleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_unknown_mnemonic_with_line() {
        let error = AssembleError::new(3, AssembleErrorKind::UnknownMnemonic("FOO".into()));
        assert_eq!(error.to_string(), "line 3: unknown mnemonic 'FOO'");
    }

    #[test]
    fn formats_invalid_operand_with_line() {
        let error = AssembleError::new(1, AssembleErrorKind::InvalidOperand("bogus".into()));
        assert_eq!(error.to_string(), "line 1: invalid operand 'bogus'");
    }
}
