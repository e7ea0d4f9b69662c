//! The 4 KiB address space of the machine.

use super::error::{Error, Result};

pub const MEM_SIZE: usize = 4096;

/// First address that can no longer be read or written.
pub const MEM_BOUND: u16 = 0xFFF;

/// Where programs are loaded and where execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// The largest program that fits between `PROGRAM_START` and `MEM_BOUND`.
pub const MAX_PROGRAM_SIZE: usize = (MEM_BOUND - PROGRAM_START) as usize;

/// Each glyph is five bytes, glyph `n` lives at `n * FONT_GLYPH_SIZE`.
pub const FONT_GLYPH_SIZE: u16 = 5;

pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Byte-addressable memory that never panics on a bad address.
/// Reads at or past `MEM_BOUND` give 0, writes there are dropped.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEM_SIZE],
}

impl Memory {
    /// Memory with the font installed and everything else zeroed.
    pub fn new() -> Memory {
        let mut memory = Memory { bytes: [0; MEM_SIZE] };
        memory.bytes[..FONT.len()].copy_from_slice(&FONT);
        memory
    }

    pub fn read(&self, addr: u16) -> u8 {
        if addr < MEM_BOUND {
            self.bytes[addr as usize]
        } else {
            0
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        if addr < MEM_BOUND {
            self.bytes[addr as usize] = value;
        }
    }

    /// Big-endian read of the opcode at `addr`.
    /// The second byte never wraps around to the start of memory.
    pub fn read_opcode(&self, addr: u16) -> u16 {
        let left = self.read(addr) as u16;
        let right = addr.checked_add(1).map_or(0, |next| self.read(next)) as u16;
        left << 8 | right
    }

    /// Copy a program into memory at `PROGRAM_START`.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        let start = PROGRAM_START as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Zero everything and reinstall the font.
    pub fn reset(&mut self) {
        *self = Memory::new();
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
