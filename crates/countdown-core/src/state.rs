//! Timer state: elapsed-time bookkeeping and the pause state machine.
//!
//! ```text
//!            p / space                 remaining <= 0
//!   Running ───────────► Paused         Running/Paused ──► Finished
//!      ▲                   │
//!      └── p / space / s ──┘            q (any state)  ──► Quit
//! ```
//!
//! Elapsed time is `elapsed_before_pause + (now - started)` while running
//! and `elapsed_before_pause` while paused. Each pause folds the running
//! stretch into `elapsed_before_pause`; each resume starts a new stretch
//! at `now`. Paused time never reaches either term.

use std::fmt;
use std::time::{Duration, Instant};

use crate::duration::CountdownDuration;
use crate::format::format_clock;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where the countdown is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Running,
    Paused,
    /// Ran out of time. Terminal.
    Finished,
    /// The user quit. Terminal.
    Quit,
}

impl Phase {
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Quit)
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
            Self::Quit => "Quit",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// What a keystroke asks the timer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `q`: stop now, no "time's up".
    Quit,
    /// `p` or space: pause if running, resume if paused.
    TogglePause,
    /// `s`: resume if paused, otherwise nothing.
    Start,
}

impl Command {
    /// Map a key to its command. Letters are case-insensitive; every other
    /// key maps to `None`.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'q' => Some(Self::Quit),
            'p' | ' ' => Some(Self::TogglePause),
            's' => Some(Self::Start),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One tick's view of the timer, handed to the renderer and then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Seconds left. Slightly negative on the final frame is normal.
    pub remaining: f64,
    /// The full countdown length in seconds.
    pub total: f64,
    /// `0..=100`.
    pub percent: f64,
    pub paused: bool,
    pub label: String,
}

impl Frame {
    /// Whether this is the last frame of a natural finish.
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Elapsed share of the total in `0.0..=1.0`, for the progress bar.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        ((self.total - self.remaining) / self.total).clamp(0.0, 1.0)
    }

    /// The remaining time as `MM:SS` / `HH:MM:SS`.
    #[must_use]
    pub fn clock(&self) -> String {
        format_clock(self.remaining)
    }

    #[must_use]
    pub const fn status(&self) -> &'static str {
        if self.paused { "Paused" } else { "Running" }
    }
}

/// Percentage of `total` already used, given the seconds `remaining`.
///
/// `0` for a zero (or negative) total. Clamped to `0..=100` so a final frame that
/// overshoots zero still reads 100.
#[must_use]
pub fn percent_complete(remaining: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    ((1.0 - remaining / total) * 100.0).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// TimerState
// ---------------------------------------------------------------------------

/// The countdown's mutable state for one run.
#[derive(Debug, Clone)]
pub struct TimerState {
    total: Duration,
    /// Running time accumulated up to the most recent pause.
    elapsed_before_pause: Duration,
    /// Start of the current running stretch. `None` while paused.
    started: Option<Instant>,
    phase: Phase,
}

impl TimerState {
    /// A running timer whose first stretch starts at `now`.
    #[must_use]
    pub const fn start(total: CountdownDuration, now: Instant) -> Self {
        Self {
            total: total.as_duration(),
            elapsed_before_pause: Duration::ZERO,
            started: Some(now),
            phase: Phase::Running,
        }
    }

    #[inline]
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(self.phase, Phase::Paused)
    }

    /// Running time banked by past pauses.
    #[inline]
    #[must_use]
    pub const fn elapsed_before_pause(&self) -> Duration {
        self.elapsed_before_pause
    }

    /// Total running time as of `now`.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        let current = self
            .started
            .map_or(Duration::ZERO, |start| now.saturating_duration_since(start));
        self.elapsed_before_pause + current
    }

    /// Seconds left as of `now`. Negative once time has run out.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> f64 {
        self.total.as_secs_f64() - self.elapsed(now).as_secs_f64()
    }

    /// Apply a command at `now`. Commands after a terminal phase are
    /// ignored.
    pub fn apply(&mut self, command: Command, now: Instant) {
        if self.phase.is_terminal() {
            return;
        }
        match command {
            Command::Quit => self.phase = Phase::Quit,
            Command::TogglePause => {
                if self.is_paused() {
                    self.resume(now);
                } else {
                    self.pause(now);
                }
            }
            Command::Start => self.resume(now),
        }
    }

    /// Bank the current stretch and stop the clock. No-op unless running.
    pub fn pause(&mut self, now: Instant) {
        if self.phase != Phase::Running {
            return;
        }
        if let Some(start) = self.started.take() {
            self.elapsed_before_pause += now.saturating_duration_since(start);
        }
        self.phase = Phase::Paused;
    }

    /// Start a new stretch at `now`. No-op unless paused.
    pub fn resume(&mut self, now: Instant) {
        if self.phase == Phase::Paused {
            self.started = Some(now);
            self.phase = Phase::Running;
        }
    }

    /// What the timer looks like at `now`, without changing it.
    #[must_use]
    pub fn snapshot(&self, now: Instant, label: &str) -> Frame {
        let total = self.total.as_secs_f64();
        let remaining = self.remaining(now);
        Frame {
            remaining,
            total,
            percent: percent_complete(remaining, total),
            paused: self.is_paused(),
            label: label.to_owned(),
        }
    }

    /// Snapshot the timer at `now`. If time has run out, the state moves
    /// to [`Phase::Finished`] and this is the last frame.
    pub fn frame(&mut self, now: Instant, label: &str) -> Frame {
        let frame = self.snapshot(now, label);
        if frame.is_done() && !self.phase.is_terminal() {
            self.phase = Phase::Finished;
        }
        frame
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
