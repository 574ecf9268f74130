//! Instruction disassembly for the Picostack-16 ISA.
//!
//! Decoding is lossy by design: a word maps back to a mnemonic and a
//! numeric operand, never to source text, labels, or comments.

use crate::encoding::{word_format, word_opcode, word_operand, Format, Opcode};
use crate::update::{MemoryKind, MemoryUpdate, REG_PC, REG_SP};

/// Placeholder mnemonic for words that decode to no assigned opcode.
pub const DATA_MNEMONIC: &str = "DATA";

/// Decodes one packed word into display text.
///
/// Never fails: unassigned opcodes degrade to [`DATA_MNEMONIC`]. The
/// filler (`-`), `NOP`, and the placeholder render bare; literal-operand
/// mnemonics append the operand as uppercase hex, zero-padded to the
/// field width (2 digits short form, 3 digits long form); everything
/// else renders bare as well.
#[must_use]
pub fn decode_word(word: u16) -> String {
    let format = word_format(word);
    let code = word_opcode(word);
    let operand = word_operand(word);

    let opcode = match format {
        Format::Short => Opcode::from_short(code),
        Format::Long => Opcode::from_long(code),
    };

    let Some(opcode) = opcode else {
        return DATA_MNEMONIC.to_string();
    };

    match opcode {
        Opcode::Nop | Opcode::Filler => opcode.name().to_string(),
        _ if opcode.takes_operand() => match format {
            Format::Short => format!("{} {operand:02X}", opcode.name()),
            Format::Long => format!("{} {operand:03X}", opcode.name()),
        },
        _ => opcode.name().to_string(),
    }
}

/// Formats a change-notification payload for display.
///
/// Memory updates include the decoded meaning of the new word; register
/// updates name the stack slot, `PC`, or `SP`.
#[must_use]
pub fn describe_update(update: &MemoryUpdate) -> String {
    match update.kind {
        MemoryKind::Mem => format!(
            "{:03X}: {:04X}  {}",
            update.address,
            update.value,
            decode_word(update.value)
        ),
        MemoryKind::Reg => {
            let name = match update.address {
                REG_PC => "PC".to_string(),
                REG_SP => "SP".to_string(),
                slot => format!("R{slot:02}"),
            };
            format!("{name} = {:04X}", update.value)
        }
    }
}
