//! Fixed-depth data stack backing the processor's register file view.

use crate::fault::Fault;

/// Number of stack slots; also the number of `Rnn` registers shown by
/// the host.
pub const STACK_DEPTH: usize = 16;

/// The 16-deep data stack.
///
/// Popped slots are zeroed rather than left stale: the host renders all
/// sixteen slots as registers, dead ones included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [0; STACK_DEPTH],
            sp: 0,
        }
    }

    /// Pushes a value onto the stack.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::StackOverflow`] when all slots are occupied.
    pub fn push(&mut self, value: u16) -> Result<(), Fault> {
        if self.sp >= STACK_DEPTH {
            return Err(Fault::StackOverflow);
        }
        self.slots[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    /// Pops the top value, zeroing the vacated slot.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::StackUnderflow`] when the stack is empty.
    pub fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        self.sp -= 1;
        let value = self.slots[self.sp];
        self.slots[self.sp] = 0;
        Ok(value)
    }

    /// Reads the top value without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::StackUnderflow`] when the stack is empty.
    pub const fn top(&self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        Ok(self.slots[self.sp - 1])
    }

    /// Reads the value below the top (next-on-stack).
    ///
    /// # Errors
    ///
    /// Returns [`Fault::StackUnderflow`] with fewer than two entries.
    pub const fn nos(&self) -> Result<u16, Fault> {
        if self.sp < 2 {
            return Err(Fault::StackUnderflow);
        }
        Ok(self.slots[self.sp - 2])
    }

    /// Current stack depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.sp
    }

    /// All slots in storage order, dead slots zeroed.
    #[must_use]
    pub const fn slots(&self) -> &[u16; STACK_DEPTH] {
        &self.slots
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
