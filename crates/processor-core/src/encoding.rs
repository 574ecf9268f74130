//! Opcode tables and instruction word packing for the Picostack-16 ISA.
//!
//! A packed instruction word is 16 bits. Bit 15 selects the format:
//!
//! - Short form (bit 15 = 0): bits 14-8 carry the opcode, bits 7-0 the
//!   operand byte.
//! - Long form (bit 15 = 1): the 4-bit opcode field occupies bits 15-12
//!   (the format flag is part of the opcode value, so all long opcodes
//!   fall in `0x8..=0xF`), bits 11-0 the operand.

/// Instruction format selected by bit 15 of the packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Format {
    /// 7-bit opcode, 8-bit operand.
    Short,
    /// 4-bit opcode (including the flag bit), 12-bit operand.
    Long,
}

/// Every assigned opcode, across both formats.
///
/// `Nop` and `Filler` share short code `0x00`; `Push` is the canonical
/// name for short code `0x10` (`PUSHL` is its alias). Decoding resolves
/// collisions to the last-declared alias in [`MNEMONIC_TABLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Opcode {
    Nop,
    Cmp,
    Stop,
    Dbg,
    Push,
    PushH,
    Drop,
    Dup,
    Swap,
    Over,
    Rot,
    Add,
    Sub,
    Inc,
    Dec,
    Mul,
    Div,
    LoadI,
    StoreI,
    Filler,
    Load,
    Store,
    Jmp,
    Jz,
    Jnz,
    Jl,
    Jg,
    Jc,
}

/// Forward mnemonic table in declaration order.
///
/// Order is load-bearing: when two names share a numeric code, the
/// last-declared name is canonical for decoding (`PUSHL`/`PUSH` resolve
/// to `PUSH`, `NOP`/`-` resolve to `-`).
pub const MNEMONIC_TABLE: &[(&str, Opcode)] = &[
    ("NOP", Opcode::Nop),
    ("CMP", Opcode::Cmp),
    ("STOP", Opcode::Stop),
    ("DBG", Opcode::Dbg),
    ("PUSHL", Opcode::Push),
    ("PUSH", Opcode::Push),
    ("PUSHH", Opcode::PushH),
    ("DROP", Opcode::Drop),
    ("DUP", Opcode::Dup),
    ("SWAP", Opcode::Swap),
    ("OVER", Opcode::Over),
    ("ROT", Opcode::Rot),
    ("ADD", Opcode::Add),
    ("SUB", Opcode::Sub),
    ("INC", Opcode::Inc),
    ("DEC", Opcode::Dec),
    ("MUL", Opcode::Mul),
    ("DIV", Opcode::Div),
    ("LOADI", Opcode::LoadI),
    ("STOREI", Opcode::StoreI),
    ("-", Opcode::Filler),
    ("LOAD", Opcode::Load),
    ("STORE", Opcode::Store),
    ("JMP", Opcode::Jmp),
    ("JZ", Opcode::Jz),
    ("JNZ", Opcode::Jnz),
    ("JL", Opcode::Jl),
    ("JG", Opcode::Jg),
    ("JC", Opcode::Jc),
];

impl Opcode {
    /// Returns the instruction format this opcode encodes in.
    #[must_use]
    pub const fn format(self) -> Format {
        match self {
            Self::Load
            | Self::Store
            | Self::Jmp
            | Self::Jz
            | Self::Jnz
            | Self::Jl
            | Self::Jg
            | Self::Jc => Format::Long,
            _ => Format::Short,
        }
    }

    /// Returns the numeric opcode value.
    ///
    /// Short codes are 7-bit values; long codes are the 4-bit field
    /// including the format flag (`0x8..=0xF`).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Nop | Self::Filler => 0x00,
            Self::Cmp => 0x01,
            Self::Stop => 0x02,
            Self::Dbg => 0x0F,
            Self::Push => 0x10,
            Self::PushH => 0x11,
            Self::Drop => 0x14,
            Self::Dup => 0x15,
            Self::Swap => 0x18,
            Self::Over => 0x19,
            Self::Rot => 0x1A,
            Self::Add => 0x20,
            Self::Sub => 0x21,
            Self::Inc => 0x22,
            Self::Dec => 0x23,
            Self::Mul => 0x24,
            Self::Div => 0x25,
            Self::LoadI => 0x44,
            Self::StoreI => 0x45,
            Self::Load => 0x8,
            Self::Store => 0x9,
            Self::Jmp => 0xA,
            Self::Jz => 0xB,
            Self::Jnz => 0xC,
            Self::Jl => 0xD,
            Self::Jg => 0xE,
            Self::Jc => 0xF,
        }
    }

    /// Canonical display name, as resolved by last-declared-alias order.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Cmp => "CMP",
            Self::Stop => "STOP",
            Self::Dbg => "DBG",
            Self::Push => "PUSH",
            Self::PushH => "PUSHH",
            Self::Drop => "DROP",
            Self::Dup => "DUP",
            Self::Swap => "SWAP",
            Self::Over => "OVER",
            Self::Rot => "ROT",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Inc => "INC",
            Self::Dec => "DEC",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::LoadI => "LOADI",
            Self::StoreI => "STOREI",
            Self::Filler => "-",
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Jmp => "JMP",
            Self::Jz => "JZ",
            Self::Jnz => "JNZ",
            Self::Jl => "JL",
            Self::Jg => "JG",
            Self::Jc => "JC",
        }
    }

    /// Whether the textual form of this opcode takes an explicit operand
    /// token: direct loads/stores, every jump, and the push family.
    ///
    /// Everything else encodes operand 0 and displays none.
    #[must_use]
    pub const fn takes_operand(self) -> bool {
        matches!(
            self,
            Self::Push
                | Self::PushH
                | Self::Load
                | Self::Store
                | Self::Jmp
                | Self::Jz
                | Self::Jnz
                | Self::Jl
                | Self::Jg
                | Self::Jc
        )
    }

    /// Packs this opcode and an operand into a 16-bit instruction word.
    ///
    /// The operand is masked to the field width (8 bits short, 12 bits
    /// long), never range-checked.
    #[must_use]
    pub const fn pack(self, operand: u16) -> u16 {
        match self.format() {
            Format::Short => ((self.code() as u16) << 8) | (operand & 0x00FF),
            Format::Long => (1 << 15) | ((self.code() as u16) << 12) | (operand & 0x0FFF),
        }
    }

    /// Resolves a short-form opcode value.
    ///
    /// `None` means the word is not an assigned instruction (`DATA`).
    /// Code 0 resolves to [`Self::Filler`], the last-declared alias.
    #[must_use]
    pub const fn from_short(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Filler),
            0x01 => Some(Self::Cmp),
            0x02 => Some(Self::Stop),
            0x0F => Some(Self::Dbg),
            0x10 => Some(Self::Push),
            0x11 => Some(Self::PushH),
            0x14 => Some(Self::Drop),
            0x15 => Some(Self::Dup),
            0x18 => Some(Self::Swap),
            0x19 => Some(Self::Over),
            0x1A => Some(Self::Rot),
            0x20 => Some(Self::Add),
            0x21 => Some(Self::Sub),
            0x22 => Some(Self::Inc),
            0x23 => Some(Self::Dec),
            0x24 => Some(Self::Mul),
            0x25 => Some(Self::Div),
            0x44 => Some(Self::LoadI),
            0x45 => Some(Self::StoreI),
            _ => None,
        }
    }

    /// Resolves a long-form opcode value (the 4-bit field including the
    /// format flag).
    #[must_use]
    pub const fn from_long(code: u8) -> Option<Self> {
        match code {
            0x8 => Some(Self::Load),
            0x9 => Some(Self::Store),
            0xA => Some(Self::Jmp),
            0xB => Some(Self::Jz),
            0xC => Some(Self::Jnz),
            0xD => Some(Self::Jl),
            0xE => Some(Self::Jg),
            0xF => Some(Self::Jc),
            _ => None,
        }
    }
}

/// Resolves a mnemonic string against the forward table.
///
/// Matching is ASCII case-insensitive; first table hit wins, so aliases
/// sharing a code resolve to the same [`Opcode`].
#[must_use]
pub fn lookup_mnemonic(name: &str) -> Option<Opcode> {
    MNEMONIC_TABLE
        .iter()
        .find(|(entry, _)| entry.eq_ignore_ascii_case(name))
        .map(|(_, opcode)| *opcode)
}

/// Extracts the format flag from a packed word.
#[must_use]
pub const fn word_format(word: u16) -> Format {
    if (word >> 15) & 1 == 1 {
        Format::Long
    } else {
        Format::Short
    }
}

/// Extracts the opcode field from a packed word, per its format.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn word_opcode(word: u16) -> u8 {
    match word_format(word) {
        Format::Short => ((word >> 8) & 0x7F) as u8,
        Format::Long => ((word >> 12) & 0xF) as u8,
    }
}

/// Extracts the operand field from a packed word, per its format.
#[must_use]
pub const fn word_operand(word: u16) -> u16 {
    match word_format(word) {
        Format::Short => word & 0x00FF,
        Format::Long => word & 0x0FFF,
    }
}
