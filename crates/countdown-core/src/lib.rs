//! # countdown-core: the timer itself
//!
//! Everything between "the user typed `2m30s`" and "a frame goes to the
//! screen", with the terminal kept behind two traits.
//!
//! ```text
//! "2m30s" ──► duration::parse ──► duration::validate ──► CountdownDuration
//!                                                              │
//!   KeySource ──► TimerLoop ◄── Clock                          │
//!                    │  owns TimerState ◄──────────────────────┘
//!                    ▼
//!                  Frame ──► RenderSink (PanelSink: big digits, status, bar)
//! ```
//!
//! Elapsed time is always re-derived from the monotonic clock, never summed
//! from tick intervals, so slow frames and scheduler jitter cannot make the
//! countdown drift.

// Seconds travel as f64 for display math and as u64/i64 for input.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod clock;
pub mod duration;
pub mod error;
pub mod format;
pub mod glyphs;
pub mod render;
pub mod settings;
pub mod state;
pub mod timer_loop;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use duration::CountdownDuration;
pub use error::TimerError;
pub use render::{PanelSink, RenderSink};
pub use settings::{TickInterval, TimerSettings};
pub use state::{Command, Frame, Phase, TimerState};
pub use timer_loop::{Outcome, TimerLoop};
