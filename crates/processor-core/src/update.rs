//! Change-notification payloads delivered to the host.
//!
//! The processor does not render anything itself; every observable state
//! change is reported through [`MemoryUpdate`] payloads so the host can
//! refresh its memory and register views.

/// Which storage region an update refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemoryKind {
    /// Main memory, addressed by word index.
    Mem,
    /// Register file: stack slots 0-15, then [`REG_PC`] and [`REG_SP`].
    Reg,
}

/// A single observed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemoryUpdate {
    /// Region the change happened in.
    pub kind: MemoryKind,
    /// Word index (for [`MemoryKind::Mem`]) or register index.
    pub address: u16,
    /// The new value at that location.
    pub value: u16,
}

/// Register index reported for program counter updates.
pub const REG_PC: u16 = 16;

/// Register index reported for stack pointer updates.
pub const REG_SP: u16 = 17;
