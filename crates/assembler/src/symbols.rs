//! Label table construction and address assignment.
//!
//! A single left-to-right scan over the parsed source. Labels record the
//! address of the next real instruction and consume no address slot
//! themselves; addresses are 0-based word indexes into the expanded
//! instruction stream, so a `PUSH` that expands to two words advances
//! the counter by two. The table is a fresh value per invocation and
//! belongs to the returned program, never to the process.

use std::collections::HashMap;

use crate::errors::AssembleResult;
use crate::expand::{expand_instruction, UnitInstruction};
use crate::parser::ParsedLine;

/// Label name to 0-based instruction address.
pub type LabelTable = HashMap<String, u16>;

/// The output of label resolution: all labels bound, all pseudo
/// instructions expanded, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProgram {
    /// Bound labels. Duplicate declarations resolve to the last one.
    pub labels: LabelTable,
    /// The expanded instruction stream in source order.
    pub instructions: Vec<UnitInstruction>,
}

/// Binds labels and expands pseudo-instructions in one scan.
///
/// # Errors
///
/// Returns the first expansion error (a non-hex `PUSH` operand).
#[allow(clippy::cast_possible_truncation)]
pub fn resolve_labels(lines: &[(usize, ParsedLine)]) -> AssembleResult<ResolvedProgram> {
    let mut labels = LabelTable::new();
    let mut instructions: Vec<UnitInstruction> = Vec::new();

    for (line, parsed) in lines {
        if let Some(name) = &parsed.label {
            labels.insert(name.clone(), instructions.len() as u16);
        }
        if let Some(instruction) = &parsed.instruction {
            instructions.extend(expand_instruction(*line, instruction)?);
        }
    }

    Ok(ResolvedProgram {
        labels,
        instructions,
    })
}
