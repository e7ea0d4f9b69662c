use super::framebuffer::Framebuffer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Represents a screen that shows what the emulator draws.
/// `refresh` is called with the whole frame after every clear or draw.
pub trait EmulatorOutput {
    fn refresh(&mut self, frame: &Framebuffer);
}

/// An output that draws nothing, but remembers what it was shown.
#[derive(Debug, Default)]
pub struct DummyOutput {
    last_frame: Option<Framebuffer>,
    refreshes: usize,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput::default()
    }

    pub fn last_frame(&self) -> Option<&Framebuffer> {
        self.last_frame.as_ref()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl EmulatorOutput for DummyOutput {
    fn refresh(&mut self, frame: &Framebuffer) {
        self.last_frame = Some(frame.clone());
        self.refreshes += 1;
    }
}

/// Publishes frames to another thread, typically a renderer.
/// Clones share the same frame.
#[derive(Clone, Default)]
pub struct SharedOutput {
    frame: Arc<Mutex<Framebuffer>>,
    dirty: Arc<AtomicBool>,
}

impl SharedOutput {
    pub fn new() -> SharedOutput {
        SharedOutput::default()
    }

    pub fn frame(&self) -> MutexGuard<'_, Framebuffer> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a new frame arrived since the last call.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }
}

impl EmulatorOutput for SharedOutput {
    fn refresh(&mut self, frame: &Framebuffer) {
        *self.frame() = frame.clone();
        self.dirty.store(true, Ordering::SeqCst);
    }
}
