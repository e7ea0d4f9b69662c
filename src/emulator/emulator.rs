//! The CHIP-8 interpreter as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use crate::emulator::config::{Config, Quirks};
use crate::emulator::control::Control;
use crate::emulator::descriptor::Descriptor;
use crate::emulator::error::Result;
use crate::emulator::framebuffer::Framebuffer;
use crate::emulator::instruction::*;
use crate::emulator::keypad::Keypad;
use crate::emulator::memory::{Memory, FONT_GLYPH_SIZE};
use crate::emulator::output::{DummyOutput, EmulatorOutput};
use crate::emulator::registers::Registers;
use crate::emulator::snapshot::Snapshot;
use crate::emulator::stack::Stack;
use crate::emulator::timer::Timers;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How long a paused interpreter sleeps before checking its controls again.
const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Whether the instruction stream is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    Running,
    /// Suspended on `FX0A` until a key is pressed; the key goes into `register`.
    WaitingForKey { register: u8 },
}

/// The outcome of a single call to `Emulator::step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// An instruction was fetched and executed.
    Executed(Instruction),
    /// Still waiting for a key, nothing was executed.
    Waiting,
    /// A key press ended the wait, the program continues after `FX0A`.
    Resumed(u8),
}

/// Where the program counter goes after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(u16),
    Stay,
}

pub struct Emulator<O: EmulatorOutput = DummyOutput> {
    memory: Memory,
    registers: Registers,
    stack: Stack,
    framebuffer: Framebuffer,
    timers: Arc<Timers>,
    keypad: Arc<Keypad>,
    rng: Box<dyn RngCore + Send>,
    state: ExecutionState,
    /// A key that arrived for `FX0A` after `run` was paused, delivered on resume.
    parked_key: Option<u8>,
    last_opcode: u16,
    config: Config,

    output: O,
}

impl Emulator<DummyOutput> {
    /// Create a new emulator that draws nowhere.
    pub fn new() -> Emulator<DummyOutput> {
        Emulator::with_output(DummyOutput::new())
    }
}

impl Default for Emulator<DummyOutput> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: EmulatorOutput> Emulator<O> {
    /// Create a new emulator with output and default configuration.
    pub fn with_output(output: O) -> Emulator<O> {
        Emulator::with_config(output, Config::default())
    }

    pub fn with_config(output: O, config: Config) -> Emulator<O> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Emulator {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: Stack::new(),
            framebuffer: Framebuffer::new(),
            timers: Arc::new(Timers::new()),
            keypad: Arc::new(Keypad::new()),
            rng: Box::new(rng),
            state: ExecutionState::Running,
            parked_key: None,
            last_opcode: 0,
            config,

            output,
        }
    }

    /// Replace the random source used by `CXNN`.
    pub fn with_rng<R: RngCore + Send + 'static>(mut self, rng: R) -> Emulator<O> {
        self.rng = Box::new(rng);
        self
    }

    /// Copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)?;
        log::info!("Loaded a {} byte program", program.len());
        Ok(())
    }

    /// Put the machine back in its power-on state.
    /// Memory is wiped too, so a program has to be loaded again.
    pub fn reset(&mut self) {
        self.memory.reset();
        self.registers.reset();
        self.stack.reset();
        self.framebuffer.clear();
        self.timers.reset();
        self.keypad.reset();
        self.state = ExecutionState::Running;
        self.parked_key = None;
        self.last_opcode = 0;
        self.output.refresh(&self.framebuffer);
    }

    /// Perform a single cycle: fetch, decode and execute one instruction.
    /// While waiting for a key this only checks whether one has arrived.
    /// Timers are not touched, see `tick_timers`.
    pub fn step(&mut self) -> Cycle {
        if let ExecutionState::WaitingForKey { .. } = self.state {
            let key = self.parked_key.take().or_else(|| self.keypad.take_pending());
            return match key {
                Some(key) => {
                    self.finish_key_wait(key);
                    Cycle::Resumed(key)
                }
                None => Cycle::Waiting,
            };
        }

        // Reads past the end of memory give 0, so fetching cannot fail.
        let pc = self.registers.pc;
        let opcode = self.memory.read_opcode(pc);
        let instruction = Instruction::from(Descriptor::decode(opcode));
        self.last_opcode = opcode;

        log::trace!("{:#05X}: {:#06X} {}", pc, opcode, instruction);

        self.execute_single(instruction);
        Cycle::Executed(instruction)
    }

    /// Execute a single instruction, as if it had been fetched at PC.
    pub fn execute_single(&mut self, instruction: Instruction) {
        let flow = self.execute(instruction);
        let pc = &mut self.registers.pc;
        match flow {
            Flow::Next => *pc = pc.wrapping_add(2),
            Flow::Skip => *pc = pc.wrapping_add(4),
            Flow::Jump(addr) => *pc = addr,
            Flow::Stay => {}
        }
    }

    /// Execute instructions sequentially.
    pub fn execute_many(&mut self, instructions: &[Instruction]) {
        for instruction in instructions {
            self.execute_single(*instruction);
        }
    }

    /// Count the delay and sound timers down by one.
    /// A session does this from its own thread at the timer frequency.
    pub fn tick_timers(&self) {
        self.timers.tick();
    }

    /// Execute until `control` says stop. Blocks on `FX0A` until a key is
    /// pressed or the keypad is cancelled. A key that arrives after a pause
    /// is held back until the interpreter resumes or single-steps.
    pub fn run(&mut self, control: &Control) {
        log::info!("Running from {:#05X}", self.registers.pc);

        while !control.is_stopped() {
            // Paused at the start of this cycle means it is a single step.
            let stepping = control.is_paused();
            if stepping && !control.take_step_request() {
                thread::sleep(PAUSE_POLL_INTERVAL);
                continue;
            }

            if let ExecutionState::WaitingForKey { .. } = self.state {
                let key = match self.parked_key.take() {
                    Some(key) => Some(key),
                    None => self.keypad.wait_for_key(),
                };
                match key {
                    Some(key) if !stepping && control.is_paused() => {
                        log::debug!("Holding key {:X} until resumed", key);
                        self.parked_key = Some(key);
                    }
                    Some(key) => self.finish_key_wait(key),
                    None => {
                        log::debug!("Key wait cancelled");
                        break;
                    }
                }
            } else {
                self.step();
            }

            if self.config.debug {
                control.publish(self.snapshot());
            }
            thread::sleep(self.config.cycle_delay);
        }

        log::info!("Stopped at {:#05X}", self.registers.pc);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            opcode: self.last_opcode,
            pc: self.registers.pc,
            i: self.registers.i,
            v: self.registers.v,
            delay_timer: self.timers.delay(),
            sound_timer: self.timers.sound(),
            keys: self.keypad.keys(),
            stack: self.stack.as_slice().to_vec(),
            state: self.state,
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn keypad(&self) -> &Arc<Keypad> {
        &self.keypad
    }

    pub fn timers(&self) -> &Arc<Timers> {
        &self.timers
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    fn finish_key_wait(&mut self, key: u8) {
        if let ExecutionState::WaitingForKey { register } = self.state {
            log::debug!("Got key {:X} for V{:X}", key, register);
            self.registers.v[register as usize] = key;
            self.registers.pc = self.registers.pc.wrapping_add(2);
            self.state = ExecutionState::Running;
        }
    }

    fn skip_if(condition: bool) -> Flow {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }

    fn execute(&mut self, instruction: Instruction) -> Flow {
        let v = &mut self.registers.v;
        match instruction {
            Instruction::ClearScreen => {
                self.framebuffer.clear();
                self.output.refresh(&self.framebuffer);
            }

            // Return past the call that got us here.
            Instruction::Return => return Flow::Jump(self.stack.pop().wrapping_add(2)),

            Instruction::Jump(Addr(addr)) => return Flow::Jump(addr),

            // Store the address of the call itself, `Return` steps over it.
            Instruction::Call(Addr(addr)) => {
                self.stack.push(self.registers.pc);
                return Flow::Jump(addr);
            }

            Instruction::SkipEqConst(Reg(x), Const(n)) => return Self::skip_if(v[x as usize] == n),
            Instruction::SkipNeqConst(Reg(x), Const(n)) => return Self::skip_if(v[x as usize] != n),
            Instruction::SkipEqReg(Reg(x), Reg(y)) => {
                return Self::skip_if(v[x as usize] == v[y as usize])
            }
            Instruction::SkipNeqReg(Reg(x), Reg(y)) => {
                return Self::skip_if(v[x as usize] != v[y as usize])
            }

            Instruction::LoadConst(Reg(x), Const(n)) => v[x as usize] = n,

            // Wraps, and leaves VF alone.
            Instruction::AddConst(Reg(x), Const(n)) => v[x as usize] = v[x as usize].wrapping_add(n),

            Instruction::Alu(op, Reg(x), Reg(y)) => self.alu(op, x as usize, y as usize),

            Instruction::LoadIndex(Addr(addr)) => self.registers.i = addr,

            Instruction::JumpOffset(Addr(addr)) => return Flow::Jump((v[0] as u16).wrapping_add(addr)),

            Instruction::Random(Reg(x), Const(n)) => v[x as usize] = self.rng.gen::<u8>() & n,

            Instruction::Draw(Reg(x), Reg(y), Const(height)) => self.draw(x as usize, y as usize, height),

            Instruction::SkipKeyDown(Reg(x)) => return Self::skip_if(self.keypad.is_down(v[x as usize])),
            Instruction::SkipKeyUp(Reg(x)) => return Self::skip_if(!self.keypad.is_down(v[x as usize])),

            Instruction::ReadDelay(Reg(x)) => v[x as usize] = self.timers.delay(),
            Instruction::SetDelay(Reg(x)) => self.timers.set_delay(v[x as usize]),
            Instruction::SetSound(Reg(x)) => self.timers.set_sound(v[x as usize]),

            // PC stays on this instruction until a key arrives.
            Instruction::WaitKey(Reg(x)) => {
                log::debug!("Waiting for a key for V{:X}", x);
                self.keypad.begin_wait();
                self.state = ExecutionState::WaitingForKey { register: x };
                return Flow::Stay;
            }

            Instruction::AddIndex(Reg(x)) => {
                self.registers.i = self.registers.i.wrapping_add(v[x as usize] as u16)
            }

            // Set i to character address. Each font element is 5 bytes wide.
            Instruction::LoadGlyph(Reg(x)) => self.registers.i = v[x as usize] as u16 * FONT_GLYPH_SIZE,

            Instruction::StoreBcd(Reg(x)) => {
                let value = v[x as usize];
                let i = self.registers.i;
                self.memory.write(i, value / 100);
                self.memory.write(i.wrapping_add(1), value / 10 % 10);
                self.memory.write(i.wrapping_add(2), value % 10);
            }

            // Dump register values up to Vx
            Instruction::StoreRegisters(Reg(x)) => {
                let i = self.registers.i;
                for reg_no in 0..=x as u16 {
                    self.memory.write(i.wrapping_add(reg_no), v[reg_no as usize]);
                }
                self.advance_index_after_load_store(x);
            }

            // Load register values up to Vx
            Instruction::LoadRegisters(Reg(x)) => {
                let i = self.registers.i;
                for reg_no in 0..=x as u16 {
                    v[reg_no as usize] = self.memory.read(i.wrapping_add(reg_no));
                }
                self.advance_index_after_load_store(x);
            }

            Instruction::Unknown(opcode) => {
                log::debug!(
                    "Skipping unknown opcode {:#06X} at {:#05X}",
                    opcode,
                    self.registers.pc
                );
            }
        };

        Flow::Next
    }

    fn advance_index_after_load_store(&mut self, x: u8) {
        let Quirks { load_store_increments_index } = self.config.quirks;
        if load_store_increments_index {
            self.registers.i = self.registers.i.wrapping_add(x as u16 + 1);
        }
    }

    /// The `8XY_` family. The flag is worked out from the operands before
    /// Vx changes and written last, so it wins when X is F.
    fn alu(&mut self, op: AluOp, x: usize, y: usize) {
        let (vx, vy) = (self.registers.v[x], self.registers.v[y]);
        let (result, flag) = match op {
            AluOp::Copy => (vy, None),
            AluOp::Or => (vx | vy, None),
            AluOp::And => (vx & vy, None),
            AluOp::Xor => (vx ^ vy, None),
            AluOp::Add => {
                let (sum, carry) = vx.overflowing_add(vy);
                (sum, Some(carry))
            }
            // VF is 1 when there is no borrow.
            AluOp::Sub => (vx.wrapping_sub(vy), Some(vx >= vy)),
            AluOp::ShiftRight => (vx >> 1, Some(vx & 0x01 != 0)),
            AluOp::SubReversed => (vy.wrapping_sub(vx), Some(vy >= vx)),
            AluOp::ShiftLeft => (vx << 1, Some(vx & 0x80 != 0)),
        };

        self.registers.v[x] = result;
        if let Some(flag) = flag {
            self.registers.set_flag(flag);
        }
    }

    /// XOR an 8 pixel wide sprite from memory at I onto the screen,
    /// wrapping around the edges. VF tells whether any lit pixel went dark.
    fn draw(&mut self, x: usize, y: usize, height: u8) {
        let x_coord = self.registers.v[x] as usize;
        let y_coord = self.registers.v[y] as usize;
        let sprite_addr = self.registers.i;

        let mut any_collisions = false;
        for row in 0..height as u16 {
            let bits = self.memory.read(sprite_addr.wrapping_add(row));
            for col in 0..8 {
                if bits & (0x80 >> col) != 0 {
                    any_collisions |= self.framebuffer.toggle(x_coord + col, y_coord + row as usize);
                }
            }
        }

        self.registers.set_flag(any_collisions);
        self.output.refresh(&self.framebuffer);
    }
}
