use super::emulator::ExecutionState;
use super::instruction::Instruction;
use super::keypad::NUM_KEYS;
use super::registers::NUM_REGISTERS;
use std::fmt;

/// A copy of the machine state for debugging. Taking one has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// The opcode most recently fetched.
    pub opcode: u16,
    pub pc: u16,
    pub i: u16,
    pub v: [u8; NUM_REGISTERS],
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub keys: [bool; NUM_KEYS],
    /// Return addresses, bottom first.
    pub stack: Vec<u16>,
    pub state: ExecutionState,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "opcode {:#06X}  {}",
            self.opcode,
            Instruction::from_u16(self.opcode)
        )?;
        writeln!(f, "PC {:#06X}  I {:#06X}  {:?}", self.pc, self.i, self.state)?;
        for (row, values) in self.v.chunks(NUM_REGISTERS / 2).enumerate() {
            for (col, value) in values.iter().enumerate() {
                if col > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "V{:X} {:02X}", row * NUM_REGISTERS / 2 + col, value)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "DT {:02X}  ST {:02X}", self.delay_timer, self.sound_timer)?;

        write!(f, "keys ")?;
        for (key, down) in self.keys.iter().enumerate() {
            if *down {
                write!(f, "{:X}", key)?;
            } else {
                write!(f, ".")?;
            }
        }
        writeln!(f)?;

        write!(f, "stack")?;
        for addr in &self.stack {
            write!(f, " {:#06X}", addr)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_debug_text() {
        let mut v = [0; NUM_REGISTERS];
        v[0xA] = 0x2B;
        let mut keys = [false; NUM_KEYS];
        keys[3] = true;
        let snapshot = Snapshot {
            opcode: 0x6A2B,
            pc: 0x202,
            i: 0x300,
            v,
            delay_timer: 0x10,
            sound_timer: 0,
            keys,
            stack: vec![0x200],
            state: ExecutionState::Running,
        };

        let expected = "\
opcode 0x6A2B  LD VA, 0x2B
PC 0x0202  I 0x0300  Running
V0 00  V1 00  V2 00  V3 00  V4 00  V5 00  V6 00  V7 00
V8 00  V9 00  VA 2B  VB 00  VC 00  VD 00  VE 00  VF 00
DT 10  ST 00
keys ...3............
stack 0x0200
";
        assert_eq!(snapshot.to_string(), expected);
    }
}
