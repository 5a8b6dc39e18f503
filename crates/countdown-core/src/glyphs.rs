//! The big-digit glyph table.
//!
//! Every glyph is [`GLYPH_HEIGHT`] rows tall, and every row of a given
//! glyph has the same width. Digits are five columns wide; the colon and
//! the space are three.

/// Rows per glyph, the same for every entry.
pub const GLYPH_HEIGHT: usize = 5;

/// One glyph: `GLYPH_HEIGHT` rows, top to bottom.
pub type Glyph = [&'static str; GLYPH_HEIGHT];

#[rustfmt::skip]
const DIGITS: [Glyph; 10] = [
    ["█████", "█   █", "█   █", "█   █", "█████"], // 0
    ["  █  ", " ██  ", "  █  ", "  █  ", " ███ "], // 1
    ["█████", "    █", "█████", "█    ", "█████"], // 2
    ["█████", "    █", " ████", "    █", "█████"], // 3
    ["█   █", "█   █", "█████", "    █", "    █"], // 4
    ["█████", "█    ", "█████", "    █", "█████"], // 5
    ["█████", "█    ", "█████", "█   █", "█████"], // 6
    ["█████", "    █", "   █ ", "  █  ", "  █  "], // 7
    ["█████", "█   █", "█████", "█   █", "█████"], // 8
    ["█████", "█   █", "█████", "    █", "█████"], // 9
];

#[rustfmt::skip]
const COLON: Glyph = ["   ", " █ ", "   ", " █ ", "   "];

#[rustfmt::skip]
const SPACE: Glyph = ["   ", "   ", "   ", "   ", "   "];

/// Look up the glyph for `ch`. Anything outside digits and `:` draws as
/// a blank.
#[must_use]
pub fn glyph(ch: char) -> &'static Glyph {
    match ch {
        ':' => &COLON,
        ' ' => &SPACE,
        _ => ch
            .to_digit(10)
            .map_or(&SPACE, |d| &DIGITS[d as usize]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Block characters and spaces are all one column wide.
    fn columns(row: &str) -> usize {
        row.chars().count()
    }

    fn all_glyphs() -> impl Iterator<Item = (char, &'static Glyph)> {
        "0123456789: ".chars().map(|c| (c, glyph(c)))
    }

    #[test]
    fn every_glyph_is_rectangular() {
        for (ch, g) in all_glyphs() {
            let width = columns(g[0]);
            assert!(width > 0, "glyph {ch:?} is empty");
            for row in g {
                assert_eq!(columns(row), width, "glyph {ch:?} has a ragged row");
            }
        }
    }

    #[test]
    fn digits_share_one_width() {
        for d in '0'..='9' {
            assert_eq!(columns(glyph(d)[0]), 5);
        }
    }

    #[test]
    fn unknown_characters_draw_as_space() {
        assert_eq!(glyph('x'), &SPACE);
        assert_eq!(glyph('٣'), &SPACE, "non-ASCII digits are not in the table");
        assert_eq!(glyph('-'), &SPACE);
    }

    #[test]
    fn digit_lookup_is_by_value() {
        assert_eq!(glyph('0'), &DIGITS[0]);
        assert_eq!(glyph('7'), &DIGITS[7]);
    }
}
