//! The delay and sound timers, and the thread that counts them down.
//!
//! The timers tick at a fixed rate, independent of how fast instructions execute.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub const TIMER_FREQUENCY: u32 = 60;

/// Delay and sound timer, shared between the interpreter and the ticker.
#[derive(Debug, Default)]
pub struct Timers {
    delay: AtomicU8,
    sound: AtomicU8,
}

impl Timers {
    pub fn new() -> Timers {
        Timers::default()
    }

    pub fn delay(&self) -> u8 {
        self.delay.load(Ordering::SeqCst)
    }

    pub fn sound(&self) -> u8 {
        self.sound.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, value: u8) {
        self.delay.store(value, Ordering::SeqCst);
    }

    pub fn set_sound(&self, value: u8) {
        self.sound.store(value, Ordering::SeqCst);
    }

    /// A tone should play while the sound timer is nonzero.
    pub fn is_sound_active(&self) -> bool {
        self.sound() > 0
    }

    /// Count both timers down by one, stopping at zero.
    pub fn tick(&self) {
        let decrement = |value: u8| value.checked_sub(1);
        // Err only means the timer was already at zero.
        let _ = self.delay.fetch_update(Ordering::SeqCst, Ordering::SeqCst, decrement);
        let _ = self.sound.fetch_update(Ordering::SeqCst, Ordering::SeqCst, decrement);
    }

    pub fn reset(&self) {
        self.set_delay(0);
        self.set_sound(0);
    }
}

/// The deadline after `deadline`. A ticker that stalled for more than a
/// period starts over from `now` instead of catching up in a burst.
fn next_deadline(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let next = deadline + period;
    if now.saturating_duration_since(deadline) > period {
        log::debug!("Timer ticker fell behind, skipping missed ticks");
        now + period
    } else {
        next
    }
}

/// A thread ticking `Timers` at a fixed frequency until stopped or dropped.
pub struct TimerTicker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TimerTicker {
    pub fn start(timers: Arc<Timers>, frequency: u32) -> TimerTicker {
        let period = Duration::from_secs(1) / frequency.max(1);
        let (stop, stopped) = channel::<()>();

        let handle = thread::spawn(move || {
            // Schedule against absolute deadlines so the rate does not drift.
            let mut deadline = Instant::now() + period;
            loop {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match stopped.recv_timeout(timeout) {
                    Err(RecvTimeoutError::Timeout) => {
                        timers.tick();
                        deadline = next_deadline(deadline, period, Instant::now());
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            log::debug!("Timer ticker stopped");
        });

        TimerTicker {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Stop ticking and wait for the thread to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Timer ticker panicked");
            }
        }
    }
}

impl Drop for TimerTicker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_decrements_and_saturates() {
        let timers = Timers::new();
        timers.set_delay(2);
        timers.set_sound(1);
        timers.tick();
        assert_eq!((timers.delay(), timers.sound()), (1, 0));
        timers.tick();
        timers.tick();
        assert_eq!((timers.delay(), timers.sound()), (0, 0));
    }

    #[test]
    fn sound_is_active_while_nonzero() {
        let timers = Timers::new();
        assert!(!timers.is_sound_active());
        timers.set_sound(3);
        assert!(timers.is_sound_active());
    }

    #[test]
    fn ticker_counts_down_in_the_background() {
        let timers = Arc::new(Timers::new());
        timers.set_delay(255);
        let ticker = TimerTicker::start(timers.clone(), 1000);
        thread::sleep(Duration::from_millis(100));
        ticker.stop();
        let after_stop = timers.delay();
        assert!(after_stop < 255, "delay timer never ticked");

        // Nothing ticks once stopped.
        thread::sleep(Duration::from_millis(20));
        assert_eq!(timers.delay(), after_stop);
    }

    #[test]
    fn ticker_runs_at_the_default_frequency() {
        let timers = Arc::new(Timers::new());
        timers.set_delay(255);
        let ticker = TimerTicker::start(timers.clone(), TIMER_FREQUENCY);
        thread::sleep(Duration::from_millis(100));
        ticker.stop();

        // 60Hz gives 6 ticks in 100ms, allow for scheduling jitter.
        let ticks = 255 - timers.delay();
        assert!((4..=8).contains(&ticks), "{} ticks in 100ms", ticks);
    }

    #[test]
    fn deadlines_advance_by_one_period() {
        let period = Duration::from_millis(10);
        let start = Instant::now();
        let deadline = start + period;
        assert_eq!(next_deadline(deadline, period, deadline), deadline + period);
        assert_eq!(
            next_deadline(deadline, period, deadline + Duration::from_millis(3)),
            deadline + period
        );
    }

    #[test]
    fn stalled_ticker_does_not_catch_up() {
        let period = Duration::from_millis(10);
        let deadline = Instant::now();
        let late = deadline + Duration::from_millis(500);
        assert_eq!(next_deadline(deadline, period, late), late + period);
    }

    #[test]
    fn dropping_the_ticker_stops_it() {
        let timers = Arc::new(Timers::new());
        timers.set_sound(200);
        {
            let _ticker = TimerTicker::start(timers.clone(), 1000);
            thread::sleep(Duration::from_millis(10));
        }
        let after_drop = timers.sound();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(timers.sound(), after_drop);
    }
}
