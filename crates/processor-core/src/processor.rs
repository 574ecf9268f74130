//! Processor execution engine for the Picostack-16 stack machine.
//!
//! The engine is synchronous and single-threaded: the host drives it one
//! [`Processor::step`] at a time and observes state changes through the
//! [`MemoryUpdate`] hook. Faulting instructions are precise: a fault
//! restores the stack and flags to their pre-instruction state and
//! leaves the program counter unmoved.

use crate::encoding::{word_format, word_opcode, word_operand, Format, Opcode};
use crate::fault::Fault;
use crate::stack::{Stack, STACK_DEPTH};
use crate::update::{MemoryKind, MemoryUpdate, REG_PC, REG_SP};

/// Number of 16-bit words of addressable memory.
pub const MEMORY_WORDS: usize = 4096;

/// Addresses wrap within the 12-bit space (the long-form operand width).
const ADDRESS_MASK: u16 = 0x0FFF;

/// Flag bit: comparison result was zero.
pub const FLAG_ZERO: u8 = 0b0000_0001;
/// Flag bit: arithmetic carried or borrowed.
pub const FLAG_CARRY: u8 = 0b0000_0010;
/// Flag bit: comparison result was greater than zero.
pub const FLAG_GREATER: u8 = 0b0000_0100;
/// Flag bit: comparison result was less than zero.
pub const FLAG_LESS: u8 = 0b0000_1000;

/// Outcome of a successful step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// One instruction retired normally.
    Executed,
    /// A `DBG` break was hit; the host may inspect state.
    DebugBreak,
    /// The processor is halted (`STOP` reached, or already halted).
    Halted,
}

/// Observer callback for state-change notifications.
pub type UpdateHook = Box<dyn FnMut(MemoryUpdate)>;

/// The processor: memory, data stack, flags, and program counter.
pub struct Processor {
    mem: [u16; MEMORY_WORDS],
    stack: Stack,
    flags: u8,
    pc: u16,
    halted: bool,
    hook: Option<UpdateHook>,
}

impl Processor {
    /// Creates a processor with zeroed memory and an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mem: [0; MEMORY_WORDS],
            stack: Stack::new(),
            flags: 0,
            pc: 0,
            halted: false,
            hook: None,
        }
    }

    /// Installs the state-change observer, replacing any previous one.
    pub fn set_update_hook(&mut self, hook: impl FnMut(MemoryUpdate) + 'static) {
        self.hook = Some(Box::new(hook));
    }

    /// Writes one word of memory and notifies the observer.
    ///
    /// The address wraps within the 12-bit address space.
    pub fn write_word(&mut self, address: u16, value: u16) {
        let address = address & ADDRESS_MASK;
        self.mem[usize::from(address)] = value;
        self.notify(MemoryUpdate {
            kind: MemoryKind::Mem,
            address,
            value,
        });
    }

    /// Reads one word of memory; the address wraps within the 12-bit
    /// address space.
    #[must_use]
    pub fn read_word(&self, address: u16) -> u16 {
        self.mem[usize::from(address & ADDRESS_MASK)]
    }

    /// The full memory contents.
    #[must_use]
    pub const fn memory(&self) -> &[u16; MEMORY_WORDS] {
        &self.mem
    }

    /// Current program counter.
    #[must_use]
    pub const fn pc(&self) -> u16 {
        self.pc
    }

    /// Current flag byte (see the `FLAG_*` constants).
    #[must_use]
    pub const fn flags(&self) -> u8 {
        self.flags
    }

    /// The data stack.
    #[must_use]
    pub const fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Whether a `STOP` has been executed since the last reset.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Restores PC, flags, and stack to the initial state and notifies
    /// the observer of the cleared registers. Memory is left untouched.
    #[allow(clippy::cast_possible_truncation)]
    pub fn reset(&mut self) {
        self.pc = 0;
        self.flags = 0;
        self.halted = false;
        self.stack = Stack::new();

        for slot in 0..STACK_DEPTH {
            self.notify(MemoryUpdate {
                kind: MemoryKind::Reg,
                address: slot as u16,
                value: 0,
            });
        }
        self.notify(MemoryUpdate {
            kind: MemoryKind::Reg,
            address: REG_PC,
            value: 0,
        });
        self.notify(MemoryUpdate {
            kind: MemoryKind::Reg,
            address: REG_SP,
            value: 0,
        });
    }

    /// Fetches, decodes, and executes one instruction.
    ///
    /// # Errors
    ///
    /// Returns a [`Fault`] on stack overflow/underflow or division by
    /// zero. Faults are precise: stack, flags, and PC are restored to
    /// their pre-instruction values.
    pub fn step(&mut self) -> Result<StepOutcome, Fault> {
        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        let word = self.mem[usize::from(self.pc & ADDRESS_MASK)];
        let saved_stack = self.stack.clone();
        let saved_flags = self.flags;

        let (outcome, jump_target) = match self.execute(word) {
            Ok(result) => result,
            Err(fault) => {
                self.stack = saved_stack;
                self.flags = saved_flags;
                return Err(fault);
            }
        };

        self.pc = jump_target.unwrap_or_else(|| (self.pc.wrapping_add(1)) & ADDRESS_MASK);
        self.notify_stack_changes(&saved_stack);
        self.notify(MemoryUpdate {
            kind: MemoryKind::Reg,
            address: REG_PC,
            value: self.pc,
        });

        Ok(outcome)
    }

    /// Executes one decoded instruction against stack, flags, and memory.
    ///
    /// Returns the step outcome plus an explicit jump target for taken
    /// jumps (callers advance the PC by one otherwise).
    #[allow(clippy::too_many_lines, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn execute(&mut self, word: u16) -> Result<(StepOutcome, Option<u16>), Fault> {
        let opcode = match word_format(word) {
            Format::Short => Opcode::from_short(word_opcode(word)),
            Format::Long => Opcode::from_long(word_opcode(word)),
        };
        let operand = word_operand(word);

        // Unassigned words are data; stepping over them does nothing.
        let Some(opcode) = opcode else {
            return Ok((StepOutcome::Executed, None));
        };

        let mut outcome = StepOutcome::Executed;
        let mut jump_target = None;

        match opcode {
            Opcode::Nop | Opcode::Filler => {}
            Opcode::Stop => {
                self.halted = true;
                outcome = StepOutcome::Halted;
            }
            Opcode::Dbg => {
                outcome = StepOutcome::DebugBreak;
            }
            Opcode::Cmp => {
                self.flags = 0;
                // Stack values are unsigned, so Less is unreachable here;
                // it is only ever set by future flag sources.
                match self.stack.top()?.cmp(&0) {
                    std::cmp::Ordering::Equal => self.flags |= FLAG_ZERO,
                    std::cmp::Ordering::Greater => self.flags |= FLAG_GREATER,
                    std::cmp::Ordering::Less => self.flags |= FLAG_LESS,
                }
            }
            Opcode::Push => self.stack.push(operand)?,
            Opcode::PushH => {
                let low = self.stack.pop()?;
                self.stack.push((operand << 8) | (low & 0x00FF))?;
            }
            Opcode::Drop => {
                self.stack.pop()?;
            }
            Opcode::Dup => {
                let top = self.stack.top()?;
                self.stack.push(top)?;
            }
            Opcode::Swap => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                self.stack.push(a)?;
                self.stack.push(b)?;
            }
            Opcode::Over => {
                let nos = self.stack.nos()?;
                self.stack.push(nos)?;
            }
            Opcode::Rot => {
                let c = self.stack.pop()?;
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                self.stack.push(b)?;
                self.stack.push(c)?;
                self.stack.push(a)?;
            }
            Opcode::Add => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                let sum = u32::from(a) + u32::from(b);
                if sum > 0xFFFF {
                    self.flags |= FLAG_CARRY;
                }
                self.stack.push(sum as u16)?;
            }
            Opcode::Sub => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                let diff = i32::from(b) - i32::from(a);
                if diff < 0 {
                    self.flags |= FLAG_CARRY;
                }
                self.stack.push(diff as u16)?;
            }
            Opcode::Inc => {
                let v = self.stack.pop()?;
                let (inc, wrapped) = v.overflowing_add(1);
                if wrapped {
                    self.flags |= FLAG_CARRY;
                }
                self.stack.push(inc)?;
            }
            Opcode::Dec => {
                let v = self.stack.pop()?;
                let (dec, wrapped) = v.overflowing_sub(1);
                if wrapped {
                    self.flags |= FLAG_CARRY;
                }
                self.stack.push(dec)?;
            }
            Opcode::Mul => {
                let a = self.stack.pop()?;
                let b = self.stack.pop()?;
                let product = u32::from(a) * u32::from(b);
                if product > 0xFFFF {
                    self.flags |= FLAG_CARRY;
                }
                self.stack.push(product as u16)?;
            }
            Opcode::Div => {
                if self.stack.top()? == 0 {
                    return Err(Fault::DivideByZero);
                }
                let divisor = self.stack.pop()?;
                let dividend = self.stack.pop()?;
                self.stack.push(dividend / divisor)?;
            }
            Opcode::LoadI => {
                let address = self.stack.pop()?;
                self.stack.push(self.read_word(address))?;
            }
            Opcode::StoreI => {
                let address = self.stack.pop()?;
                let value = self.stack.pop()?;
                self.write_word(address, value);
            }
            Opcode::Load => self.stack.push(self.read_word(operand))?,
            Opcode::Store => {
                let value = self.stack.pop()?;
                self.write_word(operand, value);
            }
            Opcode::Jmp => jump_target = Some(operand),
            Opcode::Jz => {
                if self.flags & FLAG_ZERO != 0 {
                    jump_target = Some(operand);
                }
            }
            Opcode::Jnz => {
                if self.flags & FLAG_ZERO == 0 {
                    jump_target = Some(operand);
                }
            }
            Opcode::Jl => {
                if self.flags & FLAG_LESS != 0 {
                    jump_target = Some(operand);
                }
            }
            Opcode::Jg => {
                if self.flags & FLAG_GREATER != 0 {
                    jump_target = Some(operand);
                }
            }
            Opcode::Jc => {
                if self.flags & FLAG_CARRY != 0 {
                    jump_target = Some(operand);
                }
            }
        }

        Ok((outcome, jump_target))
    }

    /// Emits register updates for stack slots that changed during a
    /// step, and an SP update when the depth moved.
    #[allow(clippy::cast_possible_truncation)]
    fn notify_stack_changes(&mut self, before: &Stack) {
        if self.hook.is_none() {
            return;
        }

        let after_slots = *self.stack.slots();
        for (slot, (old, new)) in before.slots().iter().zip(after_slots.iter()).enumerate() {
            if old != new {
                self.notify(MemoryUpdate {
                    kind: MemoryKind::Reg,
                    address: slot as u16,
                    value: *new,
                });
            }
        }

        let depth = self.stack.depth() as u16;
        if before.depth() != self.stack.depth() {
            self.notify(MemoryUpdate {
                kind: MemoryKind::Reg,
                address: REG_SP,
                value: depth,
            });
        }
    }

    fn notify(&mut self, update: MemoryUpdate) {
        if let Some(hook) = &mut self.hook {
            hook(update);
        }
    }
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}
