// SPDX-License-Identifier: MIT
//
// Styled text: spans of text with a color and attributes, grouped into
// lines.
//
// The timer's screen is a short stack of lines, each made of a few styled
// runs ("Countdown  |  42.0%  |  " in bold white, then "Running" in bold
// green). A `Line` knows its display width (via `unicode-width`, so a CJK
// label counts as two columns per character) and can be fitted to an exact
// width. Every line the live region writes must fit the terminal: a line
// that wraps would occupy two rows and break the in-place redraw.

use std::io::{self, Write};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ansi;
use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR (Select Graphic Rendition) parameters:
    ///
    /// ```
    /// use countdown_term::style::Attr;
    ///
    /// let style = Attr::BOLD | Attr::DIM;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!Attr::BOLD.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1: increased intensity.
        const BOLD = 1 << 0;
        /// SGR 2: decreased intensity (faint).
        const DIM  = 1 << 1;
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// Foreground color plus attributes for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Style {
    pub fg: CellColor,
    pub attrs: Attr,
}

impl Style {
    /// Terminal defaults: no color, no attributes.
    pub const PLAIN: Self = Self {
        fg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// A style with only a foreground color.
    #[inline]
    #[must_use]
    pub const fn fg(color: CellColor) -> Self {
        Self {
            fg: color,
            attrs: Attr::empty(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn bold(self) -> Self {
        Self {
            fg: self.fg,
            attrs: self.attrs.union(Attr::BOLD),
        }
    }

    #[inline]
    #[must_use]
    pub const fn dim(self) -> Self {
        Self {
            fg: self.fg,
            attrs: self.attrs.union(Attr::DIM),
        }
    }

    /// Whether writing this style would emit no escape codes at all.
    #[inline]
    #[must_use]
    pub const fn is_plain(self) -> bool {
        self.fg.is_default() && self.attrs.is_empty()
    }

    /// Emit the SGR sequences that switch the terminal into this style.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn apply(self, w: &mut impl Write) -> io::Result<()> {
        ansi::attrs(w, self.attrs)?;
        if !self.fg.is_default() {
            ansi::fg(w, self.fg)?;
        }
        Ok(())
    }
}

// ─── Span ────────────────────────────────────────────────────────────────────

/// A run of text drawn in a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Unstyled text.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(text, Style::PLAIN)
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

// ─── Line ────────────────────────────────────────────────────────────────────

/// Horizontal alignment used by [`Line::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// One terminal row of styled spans.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    #[must_use]
    pub const fn new() -> Self {
        Self { spans: Vec::new() }
    }

    /// Append a span (builder style).
    #[must_use]
    pub fn with(mut self, span: Span) -> Self {
        self.push(span);
        self
    }

    /// Append a span. Empty spans are dropped.
    pub fn push(&mut self, span: Span) {
        if !span.text.is_empty() {
            self.spans.push(span);
        }
    }

    /// Append every span of `other`.
    pub fn extend(&mut self, other: Self) {
        for span in other.spans {
            self.push(span);
        }
    }

    #[must_use]
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// The text with all styling stripped.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Cut the line down to at most `max` columns.
    ///
    /// A wide character that would straddle the limit is dropped whole.
    #[must_use]
    pub fn truncate(self, max: usize) -> Self {
        if self.width() <= max {
            return self;
        }

        let mut out = Self::new();
        let mut used = 0;
        for span in self.spans {
            let mut text = String::new();
            for ch in span.text.chars() {
                let w = ch.width().unwrap_or(0);
                if used + w > max {
                    break;
                }
                used += w;
                text.push(ch);
            }
            out.push(Span::new(text, span.style));
            if used >= max {
                break;
            }
        }
        out
    }

    /// Truncate or pad with spaces so the line is exactly `width` columns.
    #[must_use]
    pub fn fit(self, width: usize, align: Align) -> Self {
        let line = self.truncate(width);
        let slack = width - line.width();
        let (left, right) = match align {
            Align::Left => (0, slack),
            Align::Center => (slack / 2, slack - slack / 2),
        };

        let mut out = Self::new();
        out.push(Span::raw(" ".repeat(left)));
        out.extend(line);
        out.push(Span::raw(" ".repeat(right)));
        out
    }

    /// Write the line's text and SGR sequences. No trailing newline.
    ///
    /// Each styled span is followed by an SGR reset, so a line never leaks
    /// its style into the next one.
    ///
    /// # Errors
    ///
    /// Propagates write errors from `w`.
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        for span in &self.spans {
            if span.style.is_plain() {
                w.write_all(span.text.as_bytes())?;
            } else {
                span.style.apply(w)?;
                w.write_all(span.text.as_bytes())?;
                ansi::reset(w)?;
            }
        }
        Ok(())
    }
}

impl From<Span> for Line {
    fn from(span: Span) -> Self {
        Self::new().with(span)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
