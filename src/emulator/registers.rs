use super::memory::PROGRAM_START;

pub const NUM_REGISTERS: usize = 16;

/// Index of VF, the carry/borrow/collision flag.
pub const FLAG: usize = 0xF;

/// V0-VF, the index register and the program counter.
/// The two timers live in [`Timers`](super::timer::Timers) since they are shared with the ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub v: [u8; NUM_REGISTERS],
    pub i: u16,
    pub pc: u16,
}

impl Registers {
    pub fn new() -> Registers {
        Registers {
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: PROGRAM_START,
        }
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG]
    }

    pub fn set_flag(&mut self, value: bool) {
        self.v[FLAG] = value as u8;
    }

    pub fn reset(&mut self) {
        *self = Registers::new();
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
