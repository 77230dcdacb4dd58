use std::time::{Duration, Instant};

/// Time source for the frame loop.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn elapsed(&self) -> Duration;
    /// Block (or pretend to) for `dur`.
    fn sleep(&mut self, dur: Duration);
}

/// Wall clock; sleeps for real.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, dur: Duration) {
        std::thread::sleep(dur);
    }
}

/// Clock that only advances when slept on.
///
/// `drift` is added on every sleep, modelling work that takes longer than the requested delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
    drift: Duration,
}

impl VirtualClock {
    /// Clock at zero with no drift.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock at zero that overshoots every sleep by `drift`.
    pub fn with_drift(drift: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            drift,
        }
    }
}

impl Clock for VirtualClock {
    fn elapsed(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, dur: Duration) {
        self.now += dur + self.drift;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/clock.rs"]
mod tests;
