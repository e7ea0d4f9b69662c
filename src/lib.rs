/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Frontends

If you want to try the emulator on some programs, there is a terminal frontend
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The keys 1234/qwer/asdf/zxcv form the keypad, Space pauses, n single-steps and Esc quits.

`cargo run --bin no_frontend -- <program>` runs a program without a screen for a while
and prints what it drew, which is handy for test programs.

# Library

If you only want to run instructions, `Emulator::new()` gives an emulator that draws nowhere.
The main way of running a program is to load it as bytes and step through it.

```rust
use chip_8_vm::emulator::{Cycle, Emulator};
use chip_8_vm::emulator::instruction::{Instruction, Reg, Const};

let mut emulator = Emulator::new();

// Load a program at address 0x200.
emulator.load(&[0x6A, 0x23, 0x00, 0xE0]).unwrap();
assert_eq!(emulator.step(), Cycle::Executed(Instruction::LoadConst(Reg(0xA), Const(0x23))));
emulator.step(); // Will now clear the display

assert_eq!(emulator.registers().v[0xA], 0x23);
assert_eq!(emulator.registers().pc, 0x204);
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip_8_vm::emulator::Emulator;
use chip_8_vm::emulator::instruction::{AluOp, Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute_single(Instruction::ClearScreen);

// Or many sequentially
emulator.execute_many(&[
    Instruction::Jump(Addr(0x250)),
    Instruction::LoadConst(Reg(0xA), Const(35)),
    Instruction::Alu(AluOp::Copy, Reg(0xB), Reg(0xA)),
]);
assert_eq!(emulator.registers().v[0xB], 35);
```

## Running in real time

`Session::start` runs the interpreter on its own thread and counts the timers down
at 60Hz on another. Key presses are delivered through the keypad from any thread,
and `FX0A` blocks the interpreter until one arrives.

```rust
use chip_8_vm::emulator::{Emulator, ExecutionState, Session};
use std::{thread, time::Duration};

let mut emulator = Emulator::new();
emulator.load(&[0xF5, 0x0A, 0x12, 0x02]).unwrap(); // V5 = key, then loop

let session = Session::start(emulator);
thread::sleep(Duration::from_millis(20));
session.keypad().set_key_down(0x7);
thread::sleep(Duration::from_millis(20));

let emulator = session.stop().unwrap();
assert_eq!(emulator.registers().v[5], 0x7);
assert_eq!(emulator.state(), ExecutionState::Running);
```

## Custom output

To see what is drawn, implement `EmulatorOutput`, which gets the whole frame after
every clear and draw. Take a look at `src/emulator/output.rs`, where `SharedOutput`
hands frames to a renderer on another thread, then do the following.

```ignore
use chip_8_vm::emulator::Emulator;

let mut emulator = Emulator::with_output(MyOutput::new());
```
*/

pub mod emulator;
