//! Monotonic time source for the real-time pacing loop
//!
//! The transmitter never sleeps for a whole sample period: it waits for an
//! absolute deadline with short sleeps while the deadline is far away and a
//! busy spin for the final stretch. Isolating time behind [`Clock`] lets the
//! tests run the same loop against simulated time.

use std::time::{Duration, Instant};

/// Remaining time above which the wait loop yields with a short sleep.
pub const SPIN_THRESHOLD: Duration = Duration::from_micros(100);

/// Length of each short sleep taken while above [`SPIN_THRESHOLD`].
pub const SLEEP_QUANTUM: Duration = Duration::from_micros(50);

/// Monotonic clock with an arbitrary epoch.
pub trait Clock {
    /// Time elapsed since this clock's epoch.
    fn now(&self) -> Duration;

    /// Block the calling thread for roughly `duration`.
    fn sleep(&self, duration: Duration);

    /// One iteration of a busy wait.
    fn spin(&self) {
        std::hint::spin_loop();
    }
}

/// Wall-clock implementation backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Block until `clock.now()` reaches `deadline`.
///
/// Returns immediately when the deadline has already passed, so a late
/// iteration never delays the next one: deadlines are absolute.
pub fn wait_until<C: Clock + ?Sized>(clock: &C, deadline: Duration) {
    loop {
        let now = clock.now();
        if now >= deadline {
            return;
        }
        if deadline.saturating_sub(now) > SPIN_THRESHOLD {
            clock.sleep(SLEEP_QUANTUM);
        } else {
            clock.spin();
        }
    }
}
