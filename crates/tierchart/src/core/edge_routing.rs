//! Rasterizes connector polylines onto the ASCII canvas
//!
//! Segments are first collected as direction masks per cell, so where two
//! connectors meet or one turns a corner the painted glyph is the proper
//! junction (`┬`, `├`, `┼`, ...) instead of whichever line was drawn last.

use std::collections::BTreeMap;

use super::box_drawing::{dir, LineChars};
use super::{AsciiCanvas, CharacterSet, Line};

/// Accumulates connector segments, then paints them in one pass
#[derive(Debug, Clone)]
pub struct ConnectorPainter {
    chars: LineChars,
    cells: BTreeMap<(usize, usize), u8>,
}

impl ConnectorPainter {
    pub fn new(style: CharacterSet) -> Self {
        Self {
            chars: LineChars::new(style),
            cells: BTreeMap::new(),
        }
    }

    /// Add every segment of a polyline, snapping points to the nearest cell
    ///
    /// A diagonal segment is drawn as a horizontal run followed by a
    /// vertical one.
    pub fn add_line(&mut self, line: &Line) {
        let cells: Vec<(usize, usize)> = line
            .points
            .iter()
            .map(|p| (snap(p.x), snap(p.y)))
            .collect();

        for pair in cells.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from.0 != to.0 && from.1 != to.1 {
                let elbow = (to.0, from.1);
                self.add_horizontal(from.1, from.0, elbow.0);
                self.add_vertical(elbow.0, elbow.1, to.1);
            } else if from.1 == to.1 {
                self.add_horizontal(from.1, from.0, to.0);
            } else {
                self.add_vertical(from.0, from.1, to.1);
            }
        }
    }

    /// Horizontal run on row `y` between columns `x1` and `x2`
    pub fn add_horizontal(&mut self, y: usize, x1: usize, x2: usize) {
        let (start, end) = (x1.min(x2), x1.max(x2));
        if start == end {
            return;
        }
        for x in start..=end {
            let mut mask = 0;
            if x > start {
                mask |= dir::LEFT;
            }
            if x < end {
                mask |= dir::RIGHT;
            }
            *self.cells.entry((x, y)).or_default() |= mask;
        }
    }

    /// Vertical run in column `x` between rows `y1` and `y2`
    pub fn add_vertical(&mut self, x: usize, y1: usize, y2: usize) {
        let (start, end) = (y1.min(y2), y1.max(y2));
        if start == end {
            return;
        }
        for y in start..=end {
            let mut mask = 0;
            if y > start {
                mask |= dir::UP;
            }
            if y < end {
                mask |= dir::DOWN;
            }
            *self.cells.entry((x, y)).or_default() |= mask;
        }
    }

    /// Write the accumulated glyphs onto the canvas
    pub fn paint(&self, canvas: &mut AsciiCanvas) {
        for (&(x, y), &mask) in &self.cells {
            if let Some(glyph) = self.chars.glyph(mask) {
                canvas.set_char(x, y, glyph);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Nearest non-negative cell index for a layout coordinate
pub fn snap(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value.round() as usize
    } else {
        0
    }
}
