/// The fields of a raw opcode, split the way every CHIP-8 instruction reads them.
///
/// Decoding is total: every `u16` produces a descriptor, and whether it
/// names a real instruction is decided later by [`Instruction`](super::instruction::Instruction).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// The opcode this descriptor was decoded from.
    pub raw: u16,
    /// The top nibble, selecting the instruction family.
    pub family: u8,
    /// Second nibble, usually a register.
    pub x: u8,
    /// Third nibble, usually a register.
    pub y: u8,
    /// Lowest nibble.
    pub n: u8,
    /// Lowest byte.
    pub nn: u8,
    /// Lowest 12 bits, usually an address.
    pub nnn: u16,
}

impl Descriptor {
    pub fn decode(raw: u16) -> Descriptor {
        Descriptor {
            raw,
            family: ((raw >> 12) & 0xF) as u8,
            x: ((raw >> 8) & 0xF) as u8,
            y: ((raw >> 4) & 0xF) as u8,
            n: (raw & 0xF) as u8,
            nn: (raw & 0xFF) as u8,
            nnn: raw & 0x0FFF,
        }
    }

    /// Opcodes are stored big-endian, so the left byte is the high one.
    pub fn from_two_u8(left: u8, right: u8) -> Descriptor {
        Descriptor::decode(((left as u16) << 8) | right as u16)
    }

    /// The four nibbles from most to least significant.
    pub fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family, self.x, self.y, self.n)
    }
}
