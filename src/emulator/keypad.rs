use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

pub const NUM_KEYS: usize = 16;

struct KeypadState {
    keys: [bool; NUM_KEYS],
    /// The interpreter is blocked on `FX0A` and wants the next press.
    waiting: bool,
    /// A press handed over to the waiter but not yet picked up.
    pending: Option<u8>,
    /// Set when the machine is stopping; wakes waiters and refuses new ones.
    cancelled: bool,
}

impl KeypadState {
    fn new() -> Self {
        KeypadState {
            keys: [false; NUM_KEYS],
            waiting: false,
            pending: None,
            cancelled: false,
        }
    }
}

/// The 16-key hex keypad.
///
/// Key events come from whatever thread owns the real keyboard, while
/// the interpreter reads key states and may block waiting for a press.
/// Wrap it in an `std::sync::Arc` to share it between the two.
pub struct Keypad {
    state: Mutex<KeypadState>,
    condvar: Condvar,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad {
            state: Mutex::new(KeypadState::new()),
            condvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, KeypadState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a key as held. A fresh press satisfies a pending wait, once.
    pub fn set_key_down(&self, key: u8) {
        if key as usize >= NUM_KEYS {
            log::warn!("Ignoring press of unknown key {:#X}", key);
            return;
        }
        let mut state = self.lock();
        let was_down = std::mem::replace(&mut state.keys[key as usize], true);
        if !was_down && state.waiting && state.pending.is_none() {
            log::debug!("Key {:X} satisfies the key wait", key);
            state.pending = Some(key);
            state.waiting = false;
            self.condvar.notify_one();
        }
    }

    /// Mark a key as released. Releases never satisfy a wait.
    pub fn set_key_up(&self, key: u8) {
        if key as usize >= NUM_KEYS {
            log::warn!("Ignoring release of unknown key {:#X}", key);
            return;
        }
        self.lock().keys[key as usize] = false;
    }

    pub fn is_down(&self, key: u8) -> bool {
        self.lock()
            .keys
            .get(key as usize)
            .copied()
            .unwrap_or(false)
    }

    pub fn keys(&self) -> [bool; NUM_KEYS] {
        self.lock().keys
    }

    /// Start listening for the next key press.
    /// Presses that happened before this call do not count.
    pub fn begin_wait(&self) {
        let mut state = self.lock();
        state.waiting = true;
        state.pending = None;
    }

    pub fn is_waiting(&self) -> bool {
        self.lock().waiting
    }

    /// Take a press delivered since `begin_wait`, without blocking.
    pub fn take_pending(&self) -> Option<u8> {
        self.lock().pending.take()
    }

    /// Block until a press arrives after `begin_wait`.
    /// Returns `None` if the keypad was cancelled instead.
    pub fn wait_for_key(&self) -> Option<u8> {
        let guard = self.lock();
        let mut state = self
            .condvar
            .wait_while(guard, |s| s.pending.is_none() && !s.cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        state.pending.take()
    }

    /// Like `wait_for_key`, but gives up after `timeout`.
    pub fn wait_for_key_timeout(&self, timeout: Duration) -> Option<u8> {
        let guard = self.lock();
        let (mut state, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |s| s.pending.is_none() && !s.cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        state.pending.take()
    }

    /// Wake any waiter empty-handed and refuse to block until
    /// `clear_cancellation` or `reset`. An interrupted wait stays armed.
    pub fn cancel(&self) {
        self.lock().cancelled = true;
        self.condvar.notify_all();
    }

    pub fn clear_cancellation(&self) {
        self.lock().cancelled = false;
    }

    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// Release every key and drop any wait in progress.
    pub fn reset(&self) {
        *self.lock() = KeypadState::new();
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}
