//! Fixed-interval ticker
//!
//! The underlying sensors are poll-based, so every loop in this subsystem
//! is an explicit sleep-then-check ticker rather than event-driven
//! dispatch. The sleeps are the only suspension points in the pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// spin_sleep keeps short periods (1ms poll loop) accurate where
// std::thread::sleep would overshoot by a scheduler quantum.
use spin_sleep::SpinSleeper;

/// Sleep-based fixed-interval ticker.
pub struct Ticker {
    period: Duration,
    sleeper: SpinSleeper,
}

impl Ticker {
    /// Create a ticker with a fixed period.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            sleeper: SpinSleeper::default(),
        }
    }

    /// Sleep for one period.
    pub fn wait(&self) {
        self.sleeper.sleep(self.period);
    }

    /// Sleep for one period, waking early once `running` clears.
    ///
    /// Long periods (the multi-second diagnostic retry) are cut into
    /// 100ms slices so the stop flag is honored promptly. Short periods
    /// behave like [`wait`](Self::wait).
    pub fn wait_while(&self, running: &AtomicBool) {
        const SLICE: Duration = Duration::from_millis(100);
        let mut remaining = self.period;
        while !remaining.is_zero() && running.load(Ordering::Relaxed) {
            let step = remaining.min(SLICE);
            self.sleeper.sleep(step);
            remaining = remaining.saturating_sub(step);
        }
    }

    /// The configured period.
    pub fn period(&self) -> Duration {
        self.period
    }
}
