// SPDX-License-Identifier: MIT
//
// Terminal colors.
//
// The timer paints with a handful of fixed colors, so this is only the
// compact `CellColor` the ANSI writer understands plus names for the
// palette entries the panel is drawn in. Truecolor is used where the
// standard palette has no good match (the progress bar's pink and green).

/// Compact color for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color (inherits from terminal settings).
    #[default]
    Default,
}

impl CellColor {
    pub const GREEN: Self = Self::Ansi256(2);
    pub const YELLOW: Self = Self::Ansi256(3);
    pub const WHITE: Self = Self::Ansi256(7);
    pub const BRIGHT_BLUE: Self = Self::Ansi256(12);
    pub const BRIGHT_CYAN: Self = Self::Ansi256(14);

    /// Whether this is the terminal's own default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}
