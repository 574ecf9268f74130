//! Core processor crate for Picostack-16.

/// Instruction formats, opcode numbering, and word packing.
pub mod encoding;
pub use encoding::{
    lookup_mnemonic, word_format, word_opcode, word_operand, Format, Opcode, MNEMONIC_TABLE,
};

/// Word and update-line disassembly.
pub mod disasm;
pub use disasm::{decode_word, describe_update, DATA_MNEMONIC};

/// Runtime fault taxonomy.
pub mod fault;
pub use fault::Fault;

/// State-change notifications for host observers.
pub mod update;
pub use update::{MemoryKind, MemoryUpdate, REG_PC, REG_SP};

/// The fixed-depth data stack.
pub mod stack;
pub use stack::{Stack, STACK_DEPTH};

/// The execution engine.
pub mod processor;
pub use processor::{
    Processor, StepOutcome, UpdateHook, FLAG_CARRY, FLAG_GREATER, FLAG_LESS, FLAG_ZERO,
    MEMORY_WORDS,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
