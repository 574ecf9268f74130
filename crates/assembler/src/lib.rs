//! Picostack-16 assembler library.

#[cfg(test)]
use tempfile as _;

/// Top-level assembly pipeline.
pub mod assembler;
/// Instruction encoding against the shared opcode table.
pub mod encoder;
/// Structured assembly error types.
pub mod errors;
/// Pseudo-instruction expansion.
pub mod expand;
/// Assembly parser for instructions and labels.
pub mod parser;
/// Label table construction and address assignment.
pub mod symbols;

pub use assembler::{assemble, assemble_line};
pub use errors::{AssembleError, AssembleErrorKind, AssembleResult};
