//! Top-level assembler pipeline.
//!
//! Wires the phases together:
//!
//! 1. Parse: strip comments, classify labels and instructions.
//! 2. Expand: rewrite `PUSH` pseudo-instructions into real ones.
//! 3. Resolve: bind labels to instruction addresses.
//! 4. Encode: resolve mnemonics and operands, pack the words.
//!
//! The main entry point is [`assemble`], which takes a complete source
//! listing and returns one word per real instruction, in source order, or
//! the first error. [`assemble_line`] is the single-line variant used by
//! per-cell memory editing.

use crate::encoder::encode_instruction;
use crate::errors::AssembleResult;
use crate::expand::{Operand, UnitInstruction};
use crate::parser::{parse_line, parse_source};
use crate::symbols::{resolve_labels, LabelTable};

/// Assembles a complete source listing into memory words.
///
/// # Errors
///
/// Fail-fast: returns the first `UnknownMnemonic` or `InvalidOperand`
/// encountered, tagged with its 1-indexed source line.
pub fn assemble(source: &str) -> AssembleResult<Vec<u16>> {
    let program = resolve_labels(&parse_source(source))?;
    program
        .instructions
        .iter()
        .map(|unit| encode_instruction(unit, &program.labels))
        .collect()
}

/// Assembles a single instruction line with no label context and no
/// pseudo-instruction expansion: one line, one word.
///
/// Labels cannot be declared or referenced here; a single memory cell
/// holds a single word. Blank input encodes to `None`.
///
/// # Errors
///
/// As [`assemble`], with the line reported as 1.
pub fn assemble_line(line: &str) -> AssembleResult<Option<u16>> {
    let parsed = parse_line(line);
    let Some(instruction) = parsed.instruction else {
        return Ok(None);
    };

    let unit = UnitInstruction {
        line: 1,
        mnemonic: instruction.mnemonic,
        operand: instruction.operands.first().cloned().map(Operand::Token),
    };
    encode_instruction(&unit, &LabelTable::new()).map(Some)
}
