use super::descriptor::Descriptor;
use std::fmt;

/// A wrapper for addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Const(pub u8);

/// The register-to-register operations of the `8XY_` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Copy,        // 8XY0
    Or,          // 8XY1
    And,         // 8XY2
    Xor,         // 8XY3
    Add,         // 8XY4
    Sub,         // 8XY5
    ShiftRight,  // 8XY6
    SubReversed, // 8XY7
    ShiftLeft,   // 8XYE
}

/// A single instruction from the CHIP-8 instruction set.
/// Two bytes written in hexadecimal, with the following special characters:
/// - NNN: address
/// - NN: 8-bit constant
/// - N: 4-bit constant
/// - X and Y: 4-bit register identifier
///
/// Anything that is not a known instruction becomes `Unknown`, which
/// the emulator executes as a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,                  // 00E0
    Return,                       // 00EE
    Jump(Addr),                   // 1NNN
    Call(Addr),                   // 2NNN
    SkipEqConst(Reg, Const),      // 3XNN
    SkipNeqConst(Reg, Const),     // 4XNN
    SkipEqReg(Reg, Reg),          // 5XY0
    LoadConst(Reg, Const),        // 6XNN
    AddConst(Reg, Const),         // 7XNN
    Alu(AluOp, Reg, Reg),         // 8XY_
    SkipNeqReg(Reg, Reg),         // 9XY0
    LoadIndex(Addr),              // ANNN
    JumpOffset(Addr),             // BNNN
    Random(Reg, Const),           // CXNN
    Draw(Reg, Reg, Const),        // DXYN
    SkipKeyDown(Reg),             // EX9E
    SkipKeyUp(Reg),               // EXA1
    ReadDelay(Reg),               // FX07
    WaitKey(Reg),                 // FX0A
    SetDelay(Reg),                // FX15
    SetSound(Reg),                // FX18
    AddIndex(Reg),                // FX1E
    LoadGlyph(Reg),               // FX29
    StoreBcd(Reg),                // FX33
    StoreRegisters(Reg),          // FX55
    LoadRegisters(Reg),           // FX65
    Unknown(u16),
}

impl Instruction {
    pub fn from_u16(value: u16) -> Instruction {
        Instruction::from(Descriptor::decode(value))
    }

    pub fn from_two_u8(left: u8, right: u8) -> Instruction {
        Instruction::from(Descriptor::from_two_u8(left, right))
    }
}

impl From<Descriptor> for Instruction {
    fn from(d: Descriptor) -> Instruction {
        let (x, y) = (Reg(d.x), Reg(d.y));
        match d.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Instruction::ClearScreen,
            (0x0, 0x0, 0xE, 0xE) => Instruction::Return,
            (0x1, ..) => Instruction::Jump(Addr(d.nnn)),
            (0x2, ..) => Instruction::Call(Addr(d.nnn)),
            (0x3, ..) => Instruction::SkipEqConst(x, Const(d.nn)),
            (0x4, ..) => Instruction::SkipNeqConst(x, Const(d.nn)),
            (0x5, _, _, 0x0) => Instruction::SkipEqReg(x, y),
            (0x6, ..) => Instruction::LoadConst(x, Const(d.nn)),
            (0x7, ..) => Instruction::AddConst(x, Const(d.nn)),
            (0x8, _, _, 0x0) => Instruction::Alu(AluOp::Copy, x, y),
            (0x8, _, _, 0x1) => Instruction::Alu(AluOp::Or, x, y),
            (0x8, _, _, 0x2) => Instruction::Alu(AluOp::And, x, y),
            (0x8, _, _, 0x3) => Instruction::Alu(AluOp::Xor, x, y),
            (0x8, _, _, 0x4) => Instruction::Alu(AluOp::Add, x, y),
            (0x8, _, _, 0x5) => Instruction::Alu(AluOp::Sub, x, y),
            (0x8, _, _, 0x6) => Instruction::Alu(AluOp::ShiftRight, x, y),
            (0x8, _, _, 0x7) => Instruction::Alu(AluOp::SubReversed, x, y),
            (0x8, _, _, 0xE) => Instruction::Alu(AluOp::ShiftLeft, x, y),
            (0x9, _, _, 0x0) => Instruction::SkipNeqReg(x, y),
            (0xA, ..) => Instruction::LoadIndex(Addr(d.nnn)),
            (0xB, ..) => Instruction::JumpOffset(Addr(d.nnn)),
            (0xC, ..) => Instruction::Random(x, Const(d.nn)),
            (0xD, ..) => Instruction::Draw(x, y, Const(d.n)),
            (0xE, _, 0x9, 0xE) => Instruction::SkipKeyDown(x),
            (0xE, _, 0xA, 0x1) => Instruction::SkipKeyUp(x),
            (0xF, _, 0x0, 0x7) => Instruction::ReadDelay(x),
            (0xF, _, 0x0, 0xA) => Instruction::WaitKey(x),
            (0xF, _, 0x1, 0x5) => Instruction::SetDelay(x),
            (0xF, _, 0x1, 0x8) => Instruction::SetSound(x),
            (0xF, _, 0x1, 0xE) => Instruction::AddIndex(x),
            (0xF, _, 0x2, 0x9) => Instruction::LoadGlyph(x),
            (0xF, _, 0x3, 0x3) => Instruction::StoreBcd(x),
            (0xF, _, 0x5, 0x5) => Instruction::StoreRegisters(x),
            (0xF, _, 0x6, 0x5) => Instruction::LoadRegisters(x),
            _ => Instruction::Unknown(d.raw),
        }
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = match self {
            AluOp::Copy => "LD",
            AluOp::Or => "OR",
            AluOp::And => "AND",
            AluOp::Xor => "XOR",
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::ShiftRight => "SHR",
            AluOp::SubReversed => "SUBN",
            AluOp::ShiftLeft => "SHL",
        };
        f.write_str(mnemonic)
    }
}

/// Conventional assembler mnemonics, used for tracing and snapshots.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(Addr(a)) => write!(f, "JP {:#05X}", a),
            Call(Addr(a)) => write!(f, "CALL {:#05X}", a),
            SkipEqConst(Reg(x), Const(n)) => write!(f, "SE V{:X}, {:#04X}", x, n),
            SkipNeqConst(Reg(x), Const(n)) => write!(f, "SNE V{:X}, {:#04X}", x, n),
            SkipEqReg(Reg(x), Reg(y)) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadConst(Reg(x), Const(n)) => write!(f, "LD V{:X}, {:#04X}", x, n),
            AddConst(Reg(x), Const(n)) => write!(f, "ADD V{:X}, {:#04X}", x, n),
            Alu(op, Reg(x), Reg(y)) => write!(f, "{} V{:X}, V{:X}", op, x, y),
            SkipNeqReg(Reg(x), Reg(y)) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(Addr(a)) => write!(f, "LD I, {:#05X}", a),
            JumpOffset(Addr(a)) => write!(f, "JP V0, {:#05X}", a),
            Random(Reg(x), Const(n)) => write!(f, "RND V{:X}, {:#04X}", x, n),
            Draw(Reg(x), Reg(y), Const(n)) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyDown(Reg(x)) => write!(f, "SKP V{:X}", x),
            SkipKeyUp(Reg(x)) => write!(f, "SKNP V{:X}", x),
            ReadDelay(Reg(x)) => write!(f, "LD V{:X}, DT", x),
            WaitKey(Reg(x)) => write!(f, "LD V{:X}, K", x),
            SetDelay(Reg(x)) => write!(f, "LD DT, V{:X}", x),
            SetSound(Reg(x)) => write!(f, "LD ST, V{:X}", x),
            AddIndex(Reg(x)) => write!(f, "ADD I, V{:X}", x),
            LoadGlyph(Reg(x)) => write!(f, "LD F, V{:X}", x),
            StoreBcd(Reg(x)) => write!(f, "LD B, V{:X}", x),
            StoreRegisters(Reg(x)) => write!(f, "LD [I], V{:X}", x),
            LoadRegisters(Reg(x)) => write!(f, "LD V{:X}, [I]", x),
            Unknown(raw) => write!(f, "??? {:#06X}", raw),
        }
    }
}
