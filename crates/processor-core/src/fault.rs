use thiserror::Error;

/// Runtime faults raised by the processor while stepping.
///
/// Faults abort the current step with no side effects: stack, flags,
/// and PC keep their pre-instruction values, and the processor itself
/// stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Fault {
    /// Push attempted on a full data stack.
    #[error("stack overflow")]
    StackOverflow,
    /// Pop or peek attempted on an empty data stack.
    #[error("stack underflow")]
    StackUnderflow,
    /// `DIV` executed with zero on top of the stack.
    #[error("division by zero")]
    DivideByZero,
}
