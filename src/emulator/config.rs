use super::timer::TIMER_FREQUENCY;
use std::time::Duration;

/// Behaviours where CHIP-8 interpreters historically disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `FX55`/`FX65` leave I pointing past the last register touched,
    /// as the COSMAC VIP did. Off by default, so I is left unchanged.
    pub load_store_increments_index: bool,
}

/// How an emulator is built and run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pause between two instruction cycles in `Emulator::run`.
    pub cycle_delay: Duration,
    /// Rate at which the delay and sound timers count down.
    pub timer_frequency: u32,
    /// Seed for `CXNN`, random from the OS if unset.
    pub rng_seed: Option<u64>,
    pub quirks: Quirks,
    /// Publish a snapshot after every cycle while running in a session.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycle_delay: Duration::from_millis(2),
            timer_frequency: TIMER_FREQUENCY,
            rng_seed: None,
            quirks: Quirks::default(),
            debug: false,
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Config::default()
    }

    pub fn with_cycle_delay(mut self, cycle_delay: Duration) -> Self {
        self.cycle_delay = cycle_delay;
        self
    }

    pub fn with_timer_frequency(mut self, timer_frequency: u32) -> Self {
        self.timer_frequency = timer_frequency;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.timer_frequency, 60);
        assert_eq!(config.cycle_delay, Duration::from_millis(2));
        assert!(!config.quirks.load_store_increments_index);
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn builder_overrides() {
        let config = Config::new()
            .with_cycle_delay(Duration::from_millis(0))
            .with_rng_seed(7)
            .with_debug(true)
            .with_quirks(Quirks { load_store_increments_index: true });
        assert_eq!(config.cycle_delay, Duration::from_millis(0));
        assert_eq!(config.rng_seed, Some(7));
        assert!(config.debug);
        assert!(config.quirks.load_store_increments_index);
    }
}
