//! Loop settings: the label and the tick interval.

use std::time::Duration;

use crate::error::TimerError;

/// Label shown when none is given.
pub const DEFAULT_LABEL: &str = "Countdown";

/// Default tick: ten polls and frames per second.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Longest gap between two redraws (a 4 Hz floor), whatever the tick.
pub const MAX_REDRAW_INTERVAL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// TickInterval
// ---------------------------------------------------------------------------

/// How long the loop sleeps between ticks. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickInterval(Duration);

impl TickInterval {
    /// # Errors
    ///
    /// [`TimerError::InvalidTickInterval`] unless `secs` is positive and at
    /// least one nanosecond; [`TimerError::TickTooLarge`] if it does not fit
    /// in a [`Duration`].
    pub fn from_secs_f64(secs: f64) -> Result<Self, TimerError> {
        if secs.is_nan() || secs <= 0.0 {
            return Err(TimerError::InvalidTickInterval(secs));
        }
        match Duration::try_from_secs_f64(secs) {
            Ok(d) if d.is_zero() => Err(TimerError::InvalidTickInterval(secs)),
            Ok(d) => Ok(Self(d)),
            Err(_) => Err(TimerError::TickTooLarge(secs)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Gap between redraws: the tick itself, capped at
    /// [`MAX_REDRAW_INTERVAL`].
    #[must_use]
    pub fn redraw_interval(self) -> Duration {
        self.0.min(MAX_REDRAW_INTERVAL)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Self(DEFAULT_TICK)
    }
}

// ---------------------------------------------------------------------------
// TimerSettings
// ---------------------------------------------------------------------------

/// Everything about a run that isn't the duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSettings {
    pub label: String,
    pub tick: TickInterval,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_owned(),
            tick: TickInterval::default(),
        }
    }
}
