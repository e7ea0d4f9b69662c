use super::snapshot::Snapshot;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Run control shared between a running interpreter and whoever drives it.
#[derive(Debug, Default)]
pub struct Control {
    stopped: AtomicBool,
    paused: AtomicBool,
    step_requested: AtomicBool,
    latest: Mutex<Option<Snapshot>>,
}

impl Control {
    pub fn new() -> Control {
        Control::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        log::debug!("Pausing");
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resuming drops any single-step request that was not used yet.
    pub fn resume(&self) {
        log::debug!("Resuming");
        self.paused.store(false, Ordering::SeqCst);
        self.step_requested.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Let a paused interpreter execute exactly one more cycle.
    /// Ignored while running.
    pub fn step_once(&self) {
        if !self.is_paused() {
            log::debug!("Ignoring single step while running");
            return;
        }
        self.step_requested.store(true, Ordering::SeqCst);
    }

    /// Consume a single-step request, if there is one.
    pub(crate) fn take_step_request(&self) -> bool {
        self.step_requested.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn publish(&self, snapshot: Snapshot) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    /// The last snapshot published by the interpreter, if debugging is on.
    pub fn latest_snapshot(&self) -> Option<Snapshot> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_and_resume() {
        let control = Control::new();
        assert!(!control.is_paused());
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());
    }

    #[test]
    fn step_requests_are_consumed_once() {
        let control = Control::new();
        control.pause();
        assert!(!control.take_step_request());
        control.step_once();
        assert!(control.take_step_request());
        assert!(!control.take_step_request());
    }

    #[test]
    fn step_while_running_is_ignored() {
        let control = Control::new();
        control.step_once();
        control.pause();
        assert!(!control.take_step_request());
    }

    #[test]
    fn resume_drops_an_unused_step() {
        let control = Control::new();
        control.pause();
        control.step_once();
        control.resume();
        control.pause();
        assert!(!control.take_step_request());
    }

    #[test]
    fn stop_is_sticky() {
        let control = Control::new();
        control.stop();
        control.resume();
        assert!(control.is_stopped());
    }
}
