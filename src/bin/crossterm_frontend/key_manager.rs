use chip_8_vm::emulator::keypad::Keypad;
use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a key counts as held after the terminal last reported it.
pub const HOLD_TIMEOUT: Duration = Duration::from_millis(250);

/// The left-hand side of a qwerty keyboard, laid out like the COSMAC keypad.
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r      4 5 6 D
/// a s d f  ->  7 8 9 E
/// z x c v      A 0 B F
/// ```
const CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// Terminals only report presses (and auto-repeats of them), never releases.
/// A key is therefore released once it has not been reported for a while.
pub struct KeyManager {
    keypad: Arc<Keypad>,
    timeout: Duration,
    held: HashMap<u8, Instant>,
}

impl KeyManager {
    pub fn new(keypad: Arc<Keypad>, timeout: Duration) -> KeyManager {
        KeyManager {
            keypad,
            timeout,
            held: HashMap::new(),
        }
    }

    /// Handle a key reported by the terminal at `now`.
    /// Returns false if it is not a keypad key.
    pub fn press(&mut self, code: KeyCode, now: Instant) -> bool {
        let key = match key_to_u8(code) {
            Some(key) => key,
            None => return false,
        };
        if self.held.insert(key, now).is_none() {
            log::debug!("Key {:X} down", key);
            self.keypad.set_key_down(key);
        }
        true
    }

    /// Release every key that has not been reported within the timeout.
    pub fn release_expired(&mut self, now: Instant) {
        let timeout = self.timeout;
        let keypad = &self.keypad;
        self.held.retain(|key, last_seen| {
            let expired = now.saturating_duration_since(*last_seen) >= timeout;
            if expired {
                log::debug!("Key {:X} up", key);
                keypad.set_key_up(*key);
            }
            !expired
        });
    }
}

fn key_to_u8(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Char(c) => {
            let c = c.to_ascii_lowercase();
            CONVENTIONAL_KEYMAP
                .iter()
                .find(|(k, _)| *k == c)
                .map(|(_, key)| *key)
        }
        _ => None,
    }
}
