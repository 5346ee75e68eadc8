//! Box measurement service
//!
//! The layout core has no text model of its own. It hands each box's text and
//! width constraint to a [`MeasurementService`] and trusts the size it gets
//! back. Embedders with a real rendering surface implement the trait (or pass
//! a closure); terminals use [`CellMeasurer`].

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use super::text::{display_width, wrap_label};

/// Styling class a box is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxClass {
    /// Regular box in a horizontal level
    Normal,
    /// Box flagged `large` in a horizontal level
    Large,
    /// Box inside a vertical (stacked) run
    Stacked,
}

impl BoxClass {
    /// CSS-like class list for surfaces that style by class name
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxClass::Normal => "org-box",
            BoxClass::Large => "org-box large",
            BoxClass::Stacked => "org-box stacked",
        }
    }
}

impl fmt::Display for BoxClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One box-render request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxRequest<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub class: BoxClass,
    /// Width constraint the box must be rendered at
    pub width: f64,
}

/// Rendered size reported by a measurement service
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Renders box content at a width constraint and reports its size
///
/// Requests within one run are issued sequentially. A returned error aborts
/// the run; no partial layout is produced.
pub trait MeasurementService {
    fn measure(&self, request: &BoxRequest<'_>) -> Result<BoxSize>;
}

impl<F> MeasurementService for F
where
    F: Fn(&BoxRequest<'_>) -> Result<BoxSize>,
{
    fn measure(&self, request: &BoxRequest<'_>) -> Result<BoxSize> {
        self(request)
    }
}

/// Columns taken by the border and padding on each side of a box
const CELL_CHROME: usize = 2;

/// Measures boxes in terminal character cells
///
/// A box is a one-cell border with one cell of padding left and right. The
/// title and subtitle wrap independently inside the remaining columns, so the
/// height is two border rows plus one row per wrapped line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellMeasurer;

impl CellMeasurer {
    pub fn new() -> Self {
        Self
    }

    /// Text columns available inside a box `width` cells wide
    pub fn inner_width(width: usize) -> usize {
        width.saturating_sub(CELL_CHROME * 2).max(1)
    }

    /// Lines a box `width` cells wide renders for the given text
    pub fn layout_lines(title: &str, subtitle: Option<&str>, width: usize) -> Vec<String> {
        let inner = Self::inner_width(width);
        let mut lines = wrap_label(title, inner);
        if let Some(subtitle) = subtitle.filter(|s| !s.trim().is_empty()) {
            lines.extend(wrap_label(subtitle, inner));
        }
        lines
    }
}

impl MeasurementService for CellMeasurer {
    fn measure(&self, request: &BoxRequest<'_>) -> Result<BoxSize> {
        if !request.width.is_finite() {
            anyhow::bail!("width constraint {} is not finite", request.width);
        }
        let width = request.width.max(0.0).floor() as usize;
        let lines = Self::layout_lines(request.title, request.subtitle, width);

        // A glyph wider than the text area overflows the box, as real text does
        let widest = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
        let width = width.max(widest + CELL_CHROME * 2);
        let height = lines.len() + 2;

        Ok(BoxSize::new(width as f64, height as f64))
    }
}
