//! The CHIP-8 virtual machine and the pieces it is made of.

pub mod config;
pub mod control;
pub mod descriptor;
#[allow(clippy::module_inception)]
pub mod emulator;
pub mod error;
pub mod framebuffer;
pub mod instruction;
pub mod keypad;
pub mod memory;
pub mod output;
pub mod registers;
pub mod session;
pub mod snapshot;
pub mod stack;
pub mod timer;

pub use config::{Config, Quirks};
pub use emulator::{Cycle, Emulator, ExecutionState};
pub use error::{Error, Result};
pub use session::Session;
