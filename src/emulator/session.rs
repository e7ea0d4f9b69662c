use crate::emulator::control::Control;
use crate::emulator::emulator::Emulator;
use crate::emulator::error::{Error, Result};
use crate::emulator::keypad::Keypad;
use crate::emulator::output::EmulatorOutput;
use crate::emulator::snapshot::Snapshot;
use crate::emulator::timer::{TimerTicker, Timers};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A running emulator: the interpreter on one thread, the timers on another.
/// Key events are delivered from the caller's thread through `keypad()`.
pub struct Session<O: EmulatorOutput + Send + 'static> {
    keypad: Arc<Keypad>,
    timers: Arc<Timers>,
    control: Arc<Control>,
    interpreter: Option<JoinHandle<Emulator<O>>>,
    ticker: Option<TimerTicker>,
}

impl<O: EmulatorOutput + Send + 'static> Session<O> {
    /// Start executing `emulator` from where it currently is.
    pub fn start(mut emulator: Emulator<O>) -> Session<O> {
        let keypad = emulator.keypad().clone();
        let timers = emulator.timers().clone();
        let control = Arc::new(Control::new());

        let ticker = TimerTicker::start(timers.clone(), emulator.config().timer_frequency);

        let interpreter = {
            let control = control.clone();
            thread::spawn(move || {
                emulator.run(&control);
                emulator
            })
        };

        log::info!("Session started");
        Session {
            keypad,
            timers,
            control,
            interpreter: Some(interpreter),
            ticker: Some(ticker),
        }
    }

    pub fn keypad(&self) -> &Arc<Keypad> {
        &self.keypad
    }

    pub fn timers(&self) -> &Arc<Timers> {
        &self.timers
    }

    /// Pause, resume and single-step the interpreter.
    pub fn control(&self) -> &Arc<Control> {
        &self.control
    }

    /// The latest state published by the interpreter. Only available with `Config::debug`.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.control.latest_snapshot()
    }

    /// Stop both threads and hand the emulator back.
    /// Interrupts a pending key wait rather than waiting for a key.
    pub fn stop(mut self) -> Result<Emulator<O>> {
        self.shutdown().ok_or(Error::InterpreterPanicked)
    }

    fn shutdown(&mut self) -> Option<Emulator<O>> {
        self.control.stop();
        self.keypad.cancel();

        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }

        let emulator = match self.interpreter.take()?.join() {
            Ok(emulator) => Some(emulator),
            Err(_) => {
                log::error!("Interpreter thread panicked");
                None
            }
        };

        // An interrupted key wait stays armed, so the emulator can be run again.
        if let Some(emulator) = &emulator {
            emulator.keypad().clear_cancellation();
        }
        log::info!("Session stopped");
        emulator
    }
}

impl<O: EmulatorOutput + Send + 'static> Drop for Session<O> {
    fn drop(&mut self) {
        if self.interpreter.is_some() {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::config::Config;
    use crate::emulator::emulator::ExecutionState;
    use crate::emulator::output::DummyOutput;
    use std::time::Duration;

    fn start(program: &[u8], config: Config) -> Session<DummyOutput> {
        let mut emulator = Emulator::with_config(DummyOutput::new(), config.with_rng_seed(3));
        emulator.load(program).unwrap();
        Session::start(emulator)
    }

    fn fast() -> Config {
        Config::new().with_cycle_delay(Duration::from_millis(1))
    }

    #[test]
    fn timers_keep_ticking_while_waiting_for_a_key() {
        let program = [
            0x60, 0xFF, // V0 = 255
            0xF0, 0x15, // delay = V0
            0xF1, 0x0A, // V1 = key
            0x12, 0x06, // loop forever
        ];
        let session = start(&program, fast());

        thread::sleep(Duration::from_millis(150));
        let delay = session.timers().delay();
        assert!(delay < 255, "delay timer did not tick, still {}", delay);

        session.keypad().set_key_down(0x5);
        thread::sleep(Duration::from_millis(30));

        let emulator = session.stop().unwrap();
        assert_eq!(emulator.registers().v[1], 0x5);
        assert_eq!(emulator.registers().pc, 0x206);
        assert_eq!(emulator.state(), ExecutionState::Running);
    }

    #[test]
    fn stop_interrupts_a_pending_key_wait() {
        // V2 = key, then loop in place.
        let session = start(&[0xF2, 0x0A, 0x12, 0x02], fast());
        thread::sleep(Duration::from_millis(30));

        let emulator = session.stop().unwrap();
        assert_eq!(emulator.state(), ExecutionState::WaitingForKey { register: 2 });
        assert_eq!(emulator.registers().pc, 0x200);

        // The interrupted wait survives, so running again still picks up a key.
        let session = Session::start(emulator);
        session.keypad().set_key_down(0xB);
        thread::sleep(Duration::from_millis(30));
        let emulator = session.stop().unwrap();
        assert_eq!(emulator.registers().v[2], 0xB);
        assert_eq!(emulator.registers().pc, 0x202);
    }

    #[test]
    fn paused_interpreter_single_steps() {
        // V0 += 1, jump back.
        let session = start(&[0x70, 0x01, 0x12, 0x00], fast().with_debug(true));
        thread::sleep(Duration::from_millis(20));

        session.control().pause();
        thread::sleep(Duration::from_millis(30));
        let before = session.snapshot().expect("debug snapshots are published");
        thread::sleep(Duration::from_millis(30));
        assert_eq!(session.snapshot(), Some(before.clone()), "paused but still running");

        session.control().step_once();
        thread::sleep(Duration::from_millis(30));
        let after = session.snapshot().unwrap();
        assert_ne!(after.pc, before.pc);
        if before.pc == 0x200 {
            assert_eq!(after.v[0], before.v[0].wrapping_add(1));
        } else {
            assert_eq!(after.v[0], before.v[0]);
        }

        session.control().resume();
        thread::sleep(Duration::from_millis(30));
        assert!(session.snapshot().unwrap() != after);
        session.stop().unwrap();
    }

    #[test]
    fn snapshots_are_off_without_debug() {
        let session = start(&[0x12, 0x00], fast());
        thread::sleep(Duration::from_millis(10));
        assert_eq!(session.snapshot(), None);
    }

    #[test]
    fn dropping_a_session_stops_it() {
        let keypad = {
            let session = start(&[0xF0, 0x0A], fast());
            thread::sleep(Duration::from_millis(10));
            session.keypad().clone()
        };
        // The interpreter thread is gone, nothing holds the keypad but us.
        assert_eq!(Arc::strong_count(&keypad), 1);
    }
}
