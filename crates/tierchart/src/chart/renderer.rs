//! ASCII preview of a computed layout
//!
//! A terminal stand-in for a real rendering surface: connectors are painted
//! first, then every box is cleared and drawn over them, so lines that end
//! inside a box never show through.

use tracing::{debug, span, Level};

use super::engine::ChartLayout;
use crate::core::{
    display_width, snap, AsciiCanvas, BoxChars, CellMeasurer, CharacterSet, ConnectorPainter,
    Result,
};

/// Rasterizes a [`ChartLayout`] onto a character grid
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer {
    style: CharacterSet,
}

impl ChartRenderer {
    /// Create a renderer with the default Unicode style
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: CharacterSet) -> Self {
        Self { style }
    }

    pub fn style(&self) -> CharacterSet {
        self.style
    }

    /// Render the layout; coordinates are read as character cells
    pub fn render(&self, layout: &ChartLayout) -> Result<String> {
        let render_span = span!(Level::INFO, "render_chart", style = %self.style);
        let _enter = render_span.enter();

        let extent = layout.extent();
        let mut canvas = AsciiCanvas::new(snap(extent.width) + 1, snap(extent.height) + 1);

        let mut painter = ConnectorPainter::new(self.style);
        for line in &layout.lines {
            painter.add_line(line);
        }
        painter.paint(&mut canvas);

        for node in layout.levels.nodes() {
            let placement = layout.placements.require(node.id)?;
            let x = snap(layout.placements.require_left(node.id)?);
            let y = snap(placement.top);
            let width = snap(placement.width);
            let height = snap(placement.height);
            if width < 2 || height < 2 {
                continue;
            }

            let chars = if node.large {
                BoxChars::double(self.style)
            } else {
                BoxChars::single(self.style)
            };
            canvas.clear_rect(x, y, width, height);
            draw_border(&mut canvas, x, y, width, height, &chars);

            let inner = CellMeasurer::inner_width(width);
            let text = CellMeasurer::layout_lines(&node.title, node.subtitle.as_deref(), width);
            for (row, line) in text.iter().take(height - 2).enumerate() {
                let pad = inner.saturating_sub(display_width(line)) / 2;
                canvas.draw_text(x + 2 + pad, y + 1 + row, line, inner);
            }
        }

        debug!(
            width = canvas.width,
            height = canvas.height,
            boxes = layout.placements.len(),
            "Rendered chart preview"
        );
        Ok(canvas.to_string())
    }
}

fn draw_border(
    canvas: &mut AsciiCanvas,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    chars: &BoxChars,
) {
    let right = x + width - 1;
    let bottom = y + height - 1;

    canvas.set_char(x, y, chars.top_left);
    canvas.set_char(right, y, chars.top_right);
    canvas.set_char(x, bottom, chars.bottom_left);
    canvas.set_char(right, bottom, chars.bottom_right);
    for cx in x + 1..right {
        canvas.set_char(cx, y, chars.horizontal);
        canvas.set_char(cx, bottom, chars.horizontal);
    }
    for cy in y + 1..bottom {
        canvas.set_char(x, cy, chars.vertical);
        canvas.set_char(right, cy, chars.vertical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::engine::ChartLayoutEngine;
    use crate::chart::parser::OrgNode;

    fn preview(root: &OrgNode, style: CharacterSet) -> String {
        let layout = ChartLayoutEngine::default().recompute(root).unwrap();
        ChartRenderer::with_style(style).render(&layout).unwrap()
    }

    #[test]
    fn test_single_box() {
        let output = preview(&OrgNode::new("CEO"), CharacterSet::Unicode);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].trim_start().starts_with('┌'));
        assert!(lines[1].contains("CEO"));
        assert!(lines[2].trim_end().ends_with('┘'));
    }

    #[test]
    fn test_large_box_double_border() {
        let output = preview(&OrgNode::new("Board").large(), CharacterSet::Unicode);
        assert!(output.contains('╔'));
        assert!(output.contains('═'));
    }

    #[test]
    fn test_ascii_style_stays_ascii() {
        let root = OrgNode::new("CEO")
            .with_child(OrgNode::new("CTO"))
            .with_child(OrgNode::new("CFO"));
        let output = preview(&root, CharacterSet::Ascii);
        assert!(output.is_ascii());
        assert!(output.contains("CTO"));
        assert!(output.contains('|'));
    }

    #[test]
    fn test_connector_between_boxes() {
        let root = OrgNode::new("CEO").with_child(OrgNode::new("CTO"));
        let output = preview(&root, CharacterSet::Unicode);
        assert!(output.contains('│'));
        let ceo_row = output.lines().position(|l| l.contains("CEO")).unwrap();
        let cto_row = output.lines().position(|l| l.contains("CTO")).unwrap();
        assert!(cto_row > ceo_row + 2);
    }

    #[test]
    fn test_subtitle_rendered() {
        let root = OrgNode::new("Ada Lovelace").with_subtitle("CEO");
        let output = preview(&root, CharacterSet::Unicode);
        assert!(output.contains("Ada Lovelace"));
        assert!(output.contains("CEO"));
    }
}
