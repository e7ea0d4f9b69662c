pub const STACK_SIZE: usize = 16;

/// Fixed-depth stack of return addresses.
/// Overflow drops the address and underflow yields 0; neither is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    entries: [u16; STACK_SIZE],
    pointer: usize,
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            entries: [0; STACK_SIZE],
            pointer: 0,
        }
    }

    pub fn push(&mut self, addr: u16) {
        if self.pointer < STACK_SIZE {
            self.entries[self.pointer] = addr;
            self.pointer += 1;
        } else {
            log::warn!("Stack overflow, dropping return address {:#05X}", addr);
        }
    }

    pub fn pop(&mut self) -> u16 {
        if self.pointer == 0 {
            log::warn!("Return with an empty stack");
            return 0;
        }
        self.pointer -= 1;
        std::mem::replace(&mut self.entries[self.pointer], 0)
    }

    pub fn len(&self) -> usize {
        self.pointer
    }

    pub fn is_empty(&self) -> bool {
        self.pointer == 0
    }

    /// Return addresses from the bottom of the stack to the top.
    pub fn as_slice(&self) -> &[u16] {
        &self.entries[..self.pointer]
    }

    pub fn reset(&mut self) {
        *self = Stack::new();
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_pop() {
        let mut stack = Stack::new();
        stack.push(0x2FF);
        stack.push(0x2AB);
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.as_slice(), &[0x2FF, 0x2AB]);
        assert_eq!(stack.pop(), 0x2AB);
        assert_eq!(stack.pop(), 0x2FF);
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_returns_zero() {
        let mut stack = Stack::new();
        assert_eq!(stack.pop(), 0);
        assert_eq!(stack.pop(), 0);
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn push_beyond_capacity_is_dropped() {
        let mut stack = Stack::new();
        for addr in 0..STACK_SIZE as u16 {
            stack.push(0x200 + addr);
        }
        stack.push(0xFFF);
        assert_eq!(stack.len(), STACK_SIZE);
        assert_eq!(stack.pop(), 0x200 + STACK_SIZE as u16 - 1);
    }

    #[test]
    fn reset_empties() {
        let mut stack = Stack::new();
        stack.push(0x123);
        stack.reset();
        assert!(stack.is_empty());
        assert_eq!(stack, Stack::new());
    }
}
