//! Where the loop gets its time from.
//!
//! The timer never counts ticks. Every tick it asks the clock for `now` and
//! derives elapsed time from the instants it recorded, so the only way to
//! test the loop deterministically is to control the clock.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

/// A monotonic time source that can also wait.
pub trait Clock {
    /// The current instant. Never goes backwards.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real clock: [`Instant::now`] and [`thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// A virtual clock. Time moves only when [`sleep`](Clock::sleep) or
/// [`advance`](Self::advance) is called, and `sleep` returns at once.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Move virtual time forward without going through `sleep`, as if the
    /// process had been slow (a long render, a descheduled thread).
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Virtual time since the clock was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
