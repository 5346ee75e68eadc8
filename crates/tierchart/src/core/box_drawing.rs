//! Box and connector glyphs for the ASCII preview
//!
//! Supports both ASCII and Unicode modes.

use super::CharacterSet;

/// Box drawing characters for rendering rectangular shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxChars {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BoxChars {
    /// Border for a regular box
    pub fn single(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self::ascii(),
            CharacterSet::Unicode => Self {
                top_left: '┌',
                top_right: '┐',
                bottom_left: '└',
                bottom_right: '┘',
                horizontal: '─',
                vertical: '│',
            },
        }
    }

    /// Heavier border for boxes flagged `large`
    pub fn double(style: CharacterSet) -> Self {
        match style {
            CharacterSet::Ascii => Self {
                top_left: '#',
                top_right: '#',
                bottom_left: '#',
                bottom_right: '#',
                horizontal: '=',
                vertical: '#',
            },
            CharacterSet::Unicode => Self {
                top_left: '╔',
                top_right: '╗',
                bottom_left: '╚',
                bottom_right: '╝',
                horizontal: '═',
                vertical: '║',
            },
        }
    }

    /// ASCII-only box characters
    pub fn ascii() -> Self {
        Self {
            top_left: '+',
            top_right: '+',
            bottom_left: '+',
            bottom_right: '+',
            horizontal: '-',
            vertical: '|',
        }
    }
}

impl Default for BoxChars {
    fn default() -> Self {
        Self::single(CharacterSet::Unicode)
    }
}

/// Direction bits of a connector cell
pub mod dir {
    pub const UP: u8 = 0b0001;
    pub const DOWN: u8 = 0b0010;
    pub const LEFT: u8 = 0b0100;
    pub const RIGHT: u8 = 0b1000;
}

/// Picks the connector glyph for a cell from the directions it connects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChars {
    style: CharacterSet,
}

impl LineChars {
    pub fn new(style: CharacterSet) -> Self {
        Self { style }
    }

    /// Glyph for a combination of [`dir`] bits, `None` for an empty mask
    pub fn glyph(&self, mask: u8) -> Option<char> {
        use dir::{DOWN, LEFT, RIGHT, UP};

        if mask == 0 {
            return None;
        }
        let vertical = mask & (UP | DOWN) != 0;
        let horizontal = mask & (LEFT | RIGHT) != 0;

        if self.style.is_ascii() {
            return Some(match (vertical, horizontal) {
                (true, false) => '|',
                (false, true) => '-',
                _ => '+',
            });
        }

        Some(match mask {
            m if m == UP || m == DOWN || m == UP | DOWN => '│',
            m if m == LEFT || m == RIGHT || m == LEFT | RIGHT => '─',
            m if m == DOWN | RIGHT => '┌',
            m if m == DOWN | LEFT => '┐',
            m if m == UP | RIGHT => '└',
            m if m == UP | LEFT => '┘',
            m if m == UP | DOWN | RIGHT => '├',
            m if m == UP | DOWN | LEFT => '┤',
            m if m == LEFT | RIGHT | DOWN => '┬',
            m if m == LEFT | RIGHT | UP => '┴',
            _ => '┼',
        })
    }
}
