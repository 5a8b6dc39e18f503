//! Input errors. Everything here is caught before the timer starts.

use thiserror::Error;

/// Why a duration or tick interval was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    /// Blank duration string.
    #[error("Empty duration")]
    EmptyInput,

    /// The string matched none of the accepted duration forms.
    #[error("{0}")]
    InvalidFormat(String),

    /// Parsed, but zero or negative.
    #[error("Duration must be greater than 0")]
    NonPositiveDuration(i64),

    /// Tick interval that is zero, negative, or rounds to nothing.
    #[error("--tick must be greater than 0")]
    InvalidTickInterval(f64),

    /// Tick interval too long to hold in a `Duration` (includes infinity).
    #[error("--tick is too large")]
    TickTooLarge(f64),
}

impl TimerError {
    pub(crate) fn invalid_duration(input: &str) -> Self {
        Self::InvalidFormat(format!("Invalid duration: {input}"))
    }

    pub(crate) fn invalid_time(input: &str) -> Self {
        Self::InvalidFormat(format!("Invalid time format: {input}"))
    }
}
