//! Character grid the ASCII preview is drawn on

use unicode_width::UnicodeWidthChar;

/// ASCII canvas representing a character grid
///
/// The grid grows on demand, so callers can draw without sizing it exactly.
#[derive(Debug, Clone)]
pub struct AsciiCanvas {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<char>>,
}

/// Placeholder for the cell covered by the right half of a wide glyph
const WIDE_TAIL: char = '\0';

impl AsciiCanvas {
    /// Create a new canvas with the specified dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let grid = vec![vec![' '; width.max(1)]; height.max(1)];
        Self {
            width,
            height,
            grid,
        }
    }

    /// Ensure the canvas is at least the specified size, expanding if needed
    pub fn ensure_size(&mut self, min_width: usize, min_height: usize) {
        if min_width > self.width {
            for row in &mut self.grid {
                row.resize(min_width, ' ');
            }
            self.width = min_width;
        }
        if min_height > self.height {
            let extra_rows = min_height - self.height;
            self.grid
                .extend((0..extra_rows).map(|_| vec![' '; self.width.max(1)]));
            self.height = min_height;
        }
    }

    /// Set a character at the specified position
    pub fn set_char(&mut self, x: usize, y: usize, c: char) {
        self.ensure_size(x + 1, y + 1);
        self.grid[y][x] = c;
    }

    /// Get the character at the specified position
    pub fn get_char(&self, x: usize, y: usize) -> char {
        if y < self.height && x < self.width {
            self.grid[y][x]
        } else {
            ' '
        }
    }

    /// Draw text starting at `x`, stopping before column `x + max_width`
    ///
    /// Wide glyphs occupy two cells; returns the number of columns written.
    pub fn draw_text(&mut self, x: usize, y: usize, text: &str, max_width: usize) -> usize {
        let mut col = 0;
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if w == 0 {
                continue;
            }
            if col + w > max_width {
                break;
            }
            self.set_char(x + col, y, c);
            if w == 2 {
                self.set_char(x + col + 1, y, WIDE_TAIL);
            }
            col += w;
        }
        col
    }

    /// Overwrite a rectangle with spaces
    pub fn clear_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        if width == 0 || height == 0 {
            return;
        }
        self.ensure_size(x + width, y + height);
        for row in &mut self.grid[y..y + height] {
            for cell in &mut row[x..x + width] {
                *cell = ' ';
            }
        }
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let s: String = row.iter().filter(|c| **c != WIDE_TAIL).collect();
                s.trim_end().to_string()
            })
            .collect();

        // Trim empty rows from top and bottom
        while rows.first().is_some_and(|row| row.is_empty()) {
            rows.remove(0);
        }
        while rows.last().is_some_and(|row| row.is_empty()) {
            rows.pop();
        }

        write!(f, "{}", rows.join("\n"))
    }
}
