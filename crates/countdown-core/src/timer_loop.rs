//! The tick loop.
//!
//! One tick, in order:
//!
//! 1. read at most one key (never waits),
//! 2. apply it to the [`TimerState`],
//! 3. derive a [`Frame`] from the clock's `now` and draw it,
//! 4. sleep for the tick interval.
//!
//! This is a fixed-delay loop. Nothing assumes a tick took exactly one
//! interval: `now` is read from the clock at the top of every tick and the
//! elapsed time is recomputed from recorded instants. A slow draw or a
//! descheduled process makes the next frame jump ahead, never lag behind.
//!
//! When the tick interval is longer than [`MAX_REDRAW_INTERVAL`], the sleep
//! is cut into slices and a fresh frame is drawn after each one, so the
//! display keeps moving. Keys are still read once per tick.
//!
//! [`MAX_REDRAW_INTERVAL`]: crate::settings::MAX_REDRAW_INTERVAL

use std::io;

use countdown_term::keys::KeySource;
use tracing::{debug, info, trace};

use crate::clock::Clock;
use crate::duration::CountdownDuration;
use crate::render::RenderSink;
use crate::settings::TimerSettings;
use crate::state::{Command, Phase, TimerState};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The countdown reached zero.
    Finished,
    /// The user pressed `q`.
    Quit,
}

/// Everything a run needs, passed in rather than reached for.
pub struct TimerLoop<'a> {
    keys: &'a mut dyn KeySource,
    sink: &'a mut dyn RenderSink,
    clock: &'a dyn Clock,
    settings: TimerSettings,
}

impl<'a> TimerLoop<'a> {
    pub fn new(
        keys: &'a mut dyn KeySource,
        sink: &'a mut dyn RenderSink,
        clock: &'a dyn Clock,
        settings: TimerSettings,
    ) -> Self {
        Self {
            keys,
            sink,
            clock,
            settings,
        }
    }

    /// Count down `duration` until it runs out or the user quits.
    ///
    /// The sink's [`finish`](RenderSink::finish) is called once on the way
    /// out of a normal exit.
    ///
    /// # Errors
    ///
    /// Render errors abort the loop and are returned as-is.
    pub fn run(&mut self, duration: CountdownDuration) -> io::Result<Outcome> {
        let mut state = TimerState::start(duration, self.clock.now());
        info!(
            seconds = duration.as_secs(),
            label = %self.settings.label,
            tick = ?self.settings.tick.as_duration(),
            "countdown started"
        );

        let outcome = loop {
            if let Some(outcome) = self.tick(&mut state)? {
                break outcome;
            }
            self.wait(&state)?;
        };

        self.sink.finish(outcome)?;
        info!(?outcome, "countdown ended");
        Ok(outcome)
    }

    /// Run one tick. Returns the outcome if this tick ended the run.
    ///
    /// # Errors
    ///
    /// Render errors from the sink.
    pub fn tick(&mut self, state: &mut TimerState) -> io::Result<Option<Outcome>> {
        let now = self.clock.now();

        if let Some(key) = self.keys.poll_key() {
            match Command::from_key(key) {
                Some(command) => {
                    state.apply(command, now);
                    debug!(
                        ?command,
                        phase = %state.phase(),
                        banked = ?state.elapsed_before_pause(),
                        "key"
                    );
                }
                None => trace!(?key, "ignored key"),
            }
        }

        if state.phase() == Phase::Quit {
            return Ok(Some(Outcome::Quit));
        }

        let frame = state.frame(now, &self.settings.label);
        self.sink.draw(&frame)?;

        Ok((state.phase() == Phase::Finished).then_some(Outcome::Finished))
    }

    /// Sleep one tick interval, redrawing at least every
    /// `redraw_interval`. Returns early once time has run out so the
    /// final tick isn't held back by a long interval.
    fn wait(&mut self, state: &TimerState) -> io::Result<()> {
        let slice = self.settings.tick.redraw_interval();
        let mut left = self.settings.tick.as_duration();

        while left > slice {
            self.clock.sleep(slice);
            left -= slice;

            let frame = state.snapshot(self.clock.now(), &self.settings.label);
            if frame.is_done() {
                return Ok(());
            }
            self.sink.draw(&frame)?;
        }

        self.clock.sleep(left);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
