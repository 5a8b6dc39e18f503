//! Drawing frames.
//!
//! [`RenderSink`] is the loop's only view of the screen. [`PanelSink`] is
//! the real one: a bordered panel with the big clock, a status line, and
//! the key hints, then a full-width progress bar underneath.
//!
//! ```text
//! ╭───────────────────────── Timer ──────────────────────────╮
//! │   ░█████░█████░   ░  █  ░█████░                           │  × 5 rows
//! │ Tea  |   25.0%  |  Running                                │
//! │ Controls: [space]/p pause, s start, q quit                │
//! ╰──────────────────────────────────────────────────────────╯
//! Progress ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━  25.0%
//! ```
//!
//! Every line is laid out to exactly the sink's width, so the live region
//! can count rows without worrying about wrapping.

use std::io::{self, IsTerminal, Write};

use countdown_term::color::CellColor;
use countdown_term::live::LiveRegion;
use countdown_term::style::{Align, Line, Span, Style};
use countdown_term::terminal::{self, Size};

use crate::format::render_big;
use crate::state::Frame;
use crate::timer_loop::Outcome;

pub const TITLE: &str = "Timer";
pub const HINT: &str = "Controls: [space]/p pause, s start, q quit";
pub const DONE: &str = "Time's up!";

/// Narrowest layout. A narrower terminal shows its left edge.
pub const MIN_WIDTH: usize = 20;

const BORDER: Style = Style::fg(CellColor::BRIGHT_BLUE);
const CLOCK: Style = Style::fg(CellColor::BRIGHT_CYAN).bold();
const STATUS: Style = Style::fg(CellColor::WHITE).bold();
const RUNNING: Style = Style::fg(CellColor::GREEN).bold();
const PAUSED: Style = Style::fg(CellColor::YELLOW).bold();
const DIM: Style = Style::PLAIN.dim();
const DONE_BORDER: Style = Style::fg(CellColor::GREEN);
const DONE_TEXT: Style = Style::fg(CellColor::GREEN).bold();

const BAR_PENDING: CellColor = CellColor::Rgb(249, 38, 114);
const BAR_COMPLETE: CellColor = CellColor::Rgb(114, 156, 31);
const BAR_BACK: CellColor = CellColor::Rgb(58, 58, 58);

// ---------------------------------------------------------------------------
// RenderSink
// ---------------------------------------------------------------------------

/// Somewhere to put frames.
pub trait RenderSink {
    /// Replace whatever is on screen with `frame`.
    ///
    /// # Errors
    ///
    /// I/O errors from the output device.
    fn draw(&mut self, frame: &Frame) -> io::Result<()>;

    /// The loop is over. Called exactly once, after the last `draw`.
    ///
    /// # Errors
    ///
    /// I/O errors from the output device.
    fn finish(&mut self, outcome: Outcome) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// All lines for one frame at `width` columns.
#[must_use]
pub fn frame_lines(frame: &Frame, width: usize) -> Vec<Line> {
    let mut body: Vec<(Line, Align)> = render_big(&frame.clock())
        .into_iter()
        .map(|row| (Line::from(Span::new(row, CLOCK)), Align::Center))
        .collect();
    body.push((status_line(frame), Align::Left));
    body.push((Line::from(Span::new(HINT, DIM)), Align::Left));

    let mut lines = panel(Some(TITLE), body, width, BORDER);
    lines.push(progress_line(frame.fraction(), width));
    lines.into_iter().map(|l| l.truncate(width)).collect()
}

/// The closing banner for a natural finish.
#[must_use]
pub fn done_lines(width: usize) -> Vec<Line> {
    let body = vec![(Line::from(Span::new(DONE, DONE_TEXT)), Align::Left)];
    panel(None, body, width, DONE_BORDER)
        .into_iter()
        .map(|l| l.truncate(width))
        .collect()
}

fn status_line(frame: &Frame) -> Line {
    let status = if frame.paused { PAUSED } else { RUNNING };
    Line::from(Span::new(
        format!("{}  |  {:5.1}%  |  ", printable(&frame.label), frame.percent),
        STATUS,
    ))
    .with(Span::new(frame.status(), status))
}

/// `label` with control characters blanked. A newline or escape in the
/// label would add rows the live region cannot count.
fn printable(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn progress_line(fraction: f64, width: usize) -> Line {
    let label = Span::new("Progress", Style::PLAIN.bold());
    let percent = Span::raw(format!("{:5.1}%", fraction * 100.0));
    let bar = width.saturating_sub(label.width() + percent.width() + 2);
    let filled = ((fraction * bar as f64).round() as usize).min(bar);
    let color = if fraction >= 1.0 { BAR_COMPLETE } else { BAR_PENDING };

    Line::from(label)
        .with(Span::raw(" "))
        .with(Span::new("━".repeat(filled), Style::fg(color)))
        .with(Span::new("━".repeat(bar - filled), Style::fg(BAR_BACK)))
        .with(Span::raw(" "))
        .with(percent)
}

/// Wrap `body` in a rounded box `width` columns wide.
fn panel(title: Option<&str>, body: Vec<(Line, Align)>, width: usize, border: Style) -> Vec<Line> {
    let width = width.max(4);
    let inner = width - 4;

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push(top_border(title, width - 2, border));
    for (content, align) in body {
        let mut row = Line::from(Span::new("│ ", border));
        row.extend(content.fit(inner, align));
        row.push(Span::new(" │", border));
        lines.push(row);
    }
    lines.push(Line::from(Span::new(
        format!("╰{}╯", "─".repeat(width - 2)),
        border,
    )));
    lines
}

/// `╭── title ──╮` with `span` columns between the corners.
fn top_border(title: Option<&str>, span: usize, border: Style) -> Line {
    let label = title.map(|t| Span::new(format!(" {t} "), border.bold()));
    match label {
        Some(label) if label.width() <= span => {
            let dashes = span - label.width();
            let left = dashes / 2;
            Line::from(Span::new(format!("╭{}", "─".repeat(left)), border))
                .with(label)
                .with(Span::new(format!("{}╮", "─".repeat(dashes - left)), border))
        }
        _ => Line::from(Span::new(format!("╭{}╮", "─".repeat(span)), border)),
    }
}

// ---------------------------------------------------------------------------
// PanelSink
// ---------------------------------------------------------------------------

/// Draws frames into a [`LiveRegion`].
pub struct PanelSink<W: Write> {
    live: LiveRegion<W>,
    width: usize,
    /// Re-read the terminal width before every frame.
    follow_terminal: bool,
}

impl PanelSink<io::Stdout> {
    /// A sink on stdout that follows the terminal's width.
    ///
    /// When stdout is redirected, frames are not redrawn: only the last one
    /// is written, as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn stdout() -> io::Result<Self> {
        let out = io::stdout();
        let mut sink = if out.is_terminal() {
            Self::new(out, terminal_width())?
        } else {
            tracing::debug!("stdout is not a terminal, writing the final frame only");
            Self::redirected(out, terminal_width())
        };
        sink.follow_terminal = true;
        Ok(sink)
    }
}

impl<W: Write> PanelSink<W> {
    /// A sink on `out` with a fixed layout width.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` cannot be written.
    pub fn new(out: W, width: usize) -> io::Result<Self> {
        Ok(Self {
            live: LiveRegion::new(out)?,
            width: width.max(MIN_WIDTH),
            follow_terminal: false,
        })
    }

    /// A sink for output that is not a terminal. See
    /// [`LiveRegion::detached`].
    #[must_use]
    pub fn redirected(out: W, width: usize) -> Self {
        Self {
            live: LiveRegion::detached(out),
            width: width.max(MIN_WIDTH),
            follow_terminal: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }
}

fn terminal_width() -> usize {
    usize::from(terminal::get_size().unwrap_or(Size::FALLBACK).cols)
}

impl<W: Write> RenderSink for PanelSink<W> {
    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        if !self.follow_terminal {
            return self.live.draw(&frame_lines(frame, self.width));
        }

        let cols = terminal_width();
        self.width = cols.max(MIN_WIDTH);
        let lines: Vec<Line> = frame_lines(frame, self.width)
            .into_iter()
            .map(|l| l.truncate(cols))
            .collect();
        self.live.draw(&lines)
    }

    fn finish(&mut self, outcome: Outcome) -> io::Result<()> {
        if outcome == Outcome::Finished {
            self.live.print(&done_lines(self.width))?;
        }
        self.live.close()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
