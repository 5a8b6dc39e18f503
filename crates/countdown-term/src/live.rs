// SPDX-License-Identifier: MIT
//
// Live region: a block of lines redrawn in place.
//
// The timer does not take over the screen. It draws its frame under the
// shell prompt and, every tick, moves the cursor back to the top of that
// frame and draws the next one over it. When the timer exits the last
// frame stays in the scrollback, followed by anything printed after it.
//
// Each redraw is one buffered write wrapped in synchronized output:
//
//   CSI ?2026h                  begin sync
//   CSI <height> F              back to column 0 of the frame's first row
//   CSI 0 J                     erase the old frame
//   line \r\n line \r\n ...     the new frame
//   CSI ?2026l                  end sync
//
// This relies on every line fitting in one terminal row. Callers fit lines
// to the terminal width before drawing.
//
// The cursor is hidden while the region is live and shown again on close
// or drop. The panic hook in `terminal.rs` shows it too.
//
// Output that is not a terminal (a pipe, a file) gets a detached region
// instead: no escapes at all, and only the last frame is written, as plain
// text, when the region is closed.

use std::io::{self, Write};
use std::mem;

use crate::ansi;
use crate::output::OutputBuffer;
use crate::style::Line;
use crate::terminal::install_panic_hook;

/// An in-place redraw area at the cursor position.
///
/// ```no_run
/// use countdown_term::live::LiveRegion;
/// use countdown_term::style::{Line, Span};
///
/// let mut live = LiveRegion::new(std::io::stdout())?;
/// live.draw(&[Line::from(Span::raw("01:00"))])?;
/// live.draw(&[Line::from(Span::raw("00:59"))])?; // overwrites the first
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct LiveRegion<W: Write> {
    out: W,
    buf: OutputBuffer,
    /// Rows occupied by the last drawn frame.
    height: u16,
    /// Whether the cursor is currently hidden by us, or, when detached,
    /// whether the held frame is still unwritten.
    active: bool,
    /// Redraw in place. `false` for detached regions.
    inline: bool,
    /// Latest frame of a detached region.
    held: Vec<Line>,
}

impl<W: Write> LiveRegion<W> {
    /// Start a live region at the current cursor position and hide the
    /// cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn new(mut out: W) -> io::Result<Self> {
        install_panic_hook();

        ansi::cursor_hide(&mut out)?;
        out.flush()?;

        Ok(Self {
            out,
            buf: OutputBuffer::new(),
            height: 0,
            active: true,
            inline: true,
            held: Vec::new(),
        })
    }

    /// A region for output that is not a terminal. Nothing is written
    /// until [`print`](Self::print) or [`close`](Self::close), which write
    /// the latest frame as plain text.
    #[must_use]
    pub fn detached(out: W) -> Self {
        Self {
            out,
            buf: OutputBuffer::new(),
            height: 0,
            active: true,
            inline: false,
            held: Vec::new(),
        }
    }

    /// Replace the previous frame with `lines`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying writer fails.
    pub fn draw(&mut self, lines: &[Line]) -> io::Result<()> {
        if !self.inline {
            self.held = lines.to_vec();
            return Ok(());
        }

        self.buf.clear();
        ansi::begin_sync(&mut self.buf)?;
        ansi::cursor_prev_line(&mut self.buf, self.height)?;
        ansi::clear_below(&mut self.buf)?;
        for line in lines {
            line.write_to(&mut self.buf)?;
            self.buf.write_all(b"\r\n")?;
        }
        ansi::end_sync(&mut self.buf)?;
        self.buf.flush_to(&mut self.out)?;

        self.height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        Ok(())
    }

    /// Print `lines` below the current frame and leave both in place.
    ///
    /// The next [`draw`](Self::draw) starts a fresh frame under them.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying writer fails.
    pub fn print(&mut self, lines: &[Line]) -> io::Result<()> {
        self.buf.clear();
        if !self.inline {
            let held = mem::take(&mut self.held);
            write_plain(&mut self.buf, &held)?;
            write_plain(&mut self.buf, lines)?;
            return self.buf.flush_to(&mut self.out);
        }

        for line in lines {
            line.write_to(&mut self.buf)?;
            self.buf.write_all(b"\r\n")?;
        }
        self.buf.flush_to(&mut self.out)?;
        self.height = 0;
        Ok(())
    }

    /// Show the cursor again, or write out a detached region's last
    /// frame. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying writer fails.
    pub fn close(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        if self.inline {
            ansi::reset(&mut self.out)?;
            ansi::cursor_show(&mut self.out)?;
        } else {
            let held = mem::take(&mut self.held);
            self.buf.clear();
            write_plain(&mut self.buf, &held)?;
            self.buf.flush_to(&mut self.out)?;
        }
        self.out.flush()?;
        self.active = false;
        Ok(())
    }
}

/// Unstyled text, one `\n`-terminated row per line.
fn write_plain(buf: &mut OutputBuffer, lines: &[Line]) -> io::Result<()> {
    for line in lines {
        buf.write_all(line.plain().as_bytes())?;
        buf.write_all(b"\n")?;
    }
    Ok(())
}

impl<W: Write> Drop for LiveRegion<W> {
    fn drop(&mut self) {
        if self.active {
            if let Err(err) = self.close() {
                tracing::warn!(%err, "failed to restore cursor");
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
