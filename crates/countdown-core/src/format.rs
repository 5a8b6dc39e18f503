//! Turning seconds into text: the `MM:SS` clock string and its big-glyph
//! rendering.

use crate::glyphs::{GLYPH_HEIGHT, glyph};

/// Drawn before the first glyph and after every glyph.
pub const FILLER: char = '░';

/// Round to the nearest whole second (half up), never below zero.
fn whole_seconds(seconds: f64) -> u64 {
    let rounded = (seconds + 0.5).trunc();
    if rounded > 0.0 { rounded as u64 } else { 0 }
}

/// Format seconds as `HH:MM:SS` when there is at least one hour, else
/// `MM:SS`.
///
/// ```
/// use countdown_core::format::format_clock;
///
/// assert_eq!(format_clock(65.0), "01:05");
/// assert_eq!(format_clock(3661.0), "01:01:01");
/// assert_eq!(format_clock(-5.0), "00:00");
/// ```
#[must_use]
pub fn format_clock(seconds: f64) -> String {
    let total = whole_seconds(seconds);
    let hours = total / 3600;
    let minutes = total % 3600 / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Render `text` in big glyphs, one `String` per glyph row.
///
/// Always returns [`GLYPH_HEIGHT`] rows of equal width.
#[must_use]
pub fn render_big(text: &str) -> Vec<String> {
    let mut rows = vec![String::from(FILLER); GLYPH_HEIGHT];
    for ch in text.chars() {
        for (row, part) in rows.iter_mut().zip(glyph(ch)) {
            row.push_str(part);
            row.push(FILLER);
        }
    }
    rows
}
