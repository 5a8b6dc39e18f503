// SPDX-License-Identifier: MIT
//
// countdown-term: Terminal plumbing for the countdown timer.
//
// Direct terminal control via ANSI escape sequences and termios, with no
// TUI framework in between. The timer needs very little from the terminal:
// keystrokes delivered one at a time without echo, a way to ask "is a key
// waiting?" that never blocks, and a block of styled lines it can redraw
// in place every tick. Both the keyboard mode and the hidden cursor are
// scoped resources, restored on drop and again from the panic hook.

pub mod ansi;
pub mod color;
pub mod keys;
pub mod live;
pub mod output;
pub mod style;
pub mod terminal;
