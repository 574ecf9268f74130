//! Pseudo-instruction expansion.
//!
//! `PUSH` is the one pseudo-instruction: its short-form operand is a
//! single byte, so pushing a full 16-bit value takes a low-byte `PUSH`
//! followed by a high-byte `PUSHH` merge. Each hex operand token expands
//! independently, left to right:
//!
//! - `PUSH low` always, with `low = value & 0xFF`;
//! - `PUSHH high` additionally iff `value > 0xFF`, with
//!   `high = (value >> 8) & 0xFF`.
//!
//! Values above 0xFFFF are not rejected; byte extraction drops the high
//! bits. Expansion resolves its operands to bytes here and now: an
//! expanded byte is a value, not a token, so it can never be captured by
//! a label that happens to spell the same hex. Every other mnemonic
//! passes through as a single unit with its token untouched.

use crate::encoder::parse_hex;
use crate::errors::{AssembleError, AssembleErrorKind, AssembleResult};
use crate::parser::Instruction;

/// An operand carried by a unit instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A source token, resolved label-first at encode time.
    Token(String),
    /// A byte produced by expansion; bypasses label lookup entirely.
    Byte(u8),
}

/// One expanded instruction: a mnemonic and at most one operand, tagged
/// with the source line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInstruction {
    /// 1-indexed source line of the originating instruction.
    pub line: usize,
    /// Canonical or as-written mnemonic.
    pub mnemonic: String,
    /// The operand, if any.
    pub operand: Option<Operand>,
}

/// Expands one instruction line into its unit instructions.
///
/// # Errors
///
/// Returns `InvalidOperand` when a `PUSH` operand token is not hex.
#[allow(clippy::cast_possible_truncation)]
pub fn expand_instruction(
    line: usize,
    instruction: &Instruction,
) -> AssembleResult<Vec<UnitInstruction>> {
    if !instruction.mnemonic.eq_ignore_ascii_case("PUSH") {
        return Ok(vec![UnitInstruction {
            line,
            mnemonic: instruction.mnemonic.clone(),
            operand: instruction.operands.first().cloned().map(Operand::Token),
        }]);
    }

    let mut units = Vec::new();
    for token in &instruction.operands {
        let value = parse_hex(token).ok_or_else(|| {
            AssembleError::new(line, AssembleErrorKind::InvalidOperand(token.clone()))
        })?;

        units.push(UnitInstruction {
            line,
            mnemonic: "PUSH".into(),
            operand: Some(Operand::Byte((value & 0xFF) as u8)),
        });
        // The high-byte test looks at the raw parsed value, so a value
        // past 0xFFFF with a small low half still expands to two words.
        if value > 0xFF {
            units.push(UnitInstruction {
                line,
                mnemonic: "PUSHH".into(),
                operand: Some(Operand::Byte(((value >> 8) & 0xFF) as u8)),
            });
        }
    }
    Ok(units)
}
