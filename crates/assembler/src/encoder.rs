//! Instruction encoding against the opcode table.
//!
//! The final phase of assembly: each expanded unit instruction resolves
//! its mnemonic against the shared opcode table and packs into one 16-bit
//! word. Operand tokens for literal-taking mnemonics resolve label-first,
//! then as hex; mnemonics outside the literal set encode operand 0 and
//! ignore any token.

use processor_core::lookup_mnemonic;

use crate::errors::{AssembleError, AssembleErrorKind, AssembleResult};
use crate::expand::{Operand, UnitInstruction};
use crate::symbols::LabelTable;

/// Parses a hex token with an optional `0x`/`0X` prefix.
///
/// Returns `None` for anything that is not pure hex digits after the
/// prefix. Case-insensitive.
#[must_use]
pub fn parse_hex(token: &str) -> Option<u32> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Encodes one unit instruction into its memory word.
///
/// Byte operands produced by expansion encode directly; only source
/// tokens go through label-then-hex resolution.
///
/// # Errors
///
/// Returns `UnknownMnemonic` when the mnemonic resolves against neither
/// opcode table, and `InvalidOperand` when a literal-taking mnemonic has
/// no operand token or one that is neither a bound label nor hex.
pub fn encode_instruction(
    unit: &UnitInstruction,
    labels: &LabelTable,
) -> AssembleResult<u16> {
    let opcode = lookup_mnemonic(&unit.mnemonic).ok_or_else(|| {
        AssembleError::new(
            unit.line,
            AssembleErrorKind::UnknownMnemonic(unit.mnemonic.clone()),
        )
    })?;

    if !opcode.takes_operand() {
        return Ok(opcode.pack(0));
    }

    let operand = match &unit.operand {
        Some(Operand::Byte(byte)) => u16::from(*byte),
        Some(Operand::Token(token)) => resolve_operand(token, labels).ok_or_else(|| {
            AssembleError::new(unit.line, AssembleErrorKind::InvalidOperand(token.clone()))
        })?,
        None => {
            return Err(AssembleError::new(
                unit.line,
                AssembleErrorKind::InvalidOperand(String::new()),
            ))
        }
    };

    Ok(opcode.pack(operand))
}

/// Resolves an operand token: label-table hit first, then hex.
///
/// Label lookup is case-sensitive; hex parsing is not.
#[allow(clippy::cast_possible_truncation)]
fn resolve_operand(token: &str, labels: &LabelTable) -> Option<u16> {
    if let Some(address) = labels.get(token) {
        return Some(*address);
    }
    // Field-width masking happens in pack; keep the low 16 bits here.
    parse_hex(token).map(|value| (value & 0xFFFF) as u16)
}
