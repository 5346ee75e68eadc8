//! Tierchart - Lay out organization charts as boxes and connectors
//!
//! Takes a tree of titled nodes and computes, within a fixed width, where
//! each node's box goes and how the connector between every parent and
//! child is routed.
//!
//! # Quick Start
//!
//! ```rust
//! use tierchart::render;
//!
//! let input = r#"{"title": "CEO", "children": [{"title": "CTO"}, {"title": "CFO"}]}"#;
//! let ascii = render(input).unwrap();
//! println!("{}", ascii);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use tierchart::prelude::*;
//!
//! let root = OrgNode::new("CEO")
//!     .with_child(OrgNode::new("CTO"))
//!     .with_child(OrgNode::new("CFO").large());
//!
//! // Lay out with the terminal-cell measurer
//! let config = ChartConfig::default().with_available_space(80.0);
//! let engine = ChartLayoutEngine::with_cells(config).unwrap();
//! let layout = engine.recompute(&root).unwrap();
//!
//! // Inspect the result
//! assert_eq!(layout.placements.len(), 3);
//! assert_eq!(layout.lines.len(), 2);
//! assert_eq!(layout.levels.orientation(1), Some(Orientation::Horizontal));
//!
//! // Render to ASCII
//! let ascii = ChartRenderer::new().render(&layout).unwrap();
//! assert!(ascii.contains("CFO"));
//! ```

pub mod chart;
pub mod core;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use crate::chart::{ChartLayout, ChartLayoutEngine, ChartParser, ChartRenderer, OrgNode};
pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chart::{
        ChartLayout, ChartLayoutEngine, ChartLevel, ChartParser, ChartRenderer, ConnectedNode,
        LayoutReport, LevelMap, OrgNode,
    };
    pub use crate::core::{
        BoxClass, BoxRequest, BoxSize, CellMeasurer, CharacterSet, ChartConfig, ChartError, Line,
        MeasurementService, NodeId, Orientation, Placement, PlacementMap, Point,
    };
}

/// Lay out a JSON org chart with the default configuration
///
/// # Example
/// ```rust
/// use tierchart::layout;
///
/// let layout = layout(r#"{"title": "CEO", "children": [{"title": "CTO"}]}"#).unwrap();
/// assert_eq!(layout.placements.len(), 2);
/// assert_eq!(layout.lines.len(), 1);
/// ```
pub fn layout(input: &str) -> anyhow::Result<ChartLayout> {
    layout_with_config(input, &ChartConfig::default())
}

/// Lay out a JSON org chart with a specific configuration
///
/// Boxes are measured in terminal cells.
///
/// # Example
/// ```rust
/// use tierchart::{layout_with_config, ChartConfig};
///
/// let config = ChartConfig::default().with_available_space(60.0);
/// let layout = layout_with_config(r#"{"title": "CEO"}"#, &config).unwrap();
/// let root = layout.placements.get(0).unwrap();
/// assert_eq!(root.left, Some((60.0 - root.width) / 2.0));
/// ```
pub fn layout_with_config(input: &str, config: &ChartConfig) -> anyhow::Result<ChartLayout> {
    let root = parse(input)?;
    let engine = ChartLayoutEngine::with_cells(config.clone())?;
    Ok(engine.recompute(&root)?)
}

/// Render a JSON org chart as a Unicode text preview
///
/// # Example
/// ```rust
/// use tierchart::render;
///
/// let ascii = render(r#"{"title": "CEO", "children": [{"title": "CTO"}]}"#).unwrap();
/// assert!(ascii.contains("CEO"));
/// assert!(ascii.contains("CTO"));
/// ```
pub fn render(input: &str) -> anyhow::Result<String> {
    render_with_style(input, &ChartConfig::default(), CharacterSet::default())
}

/// Render a JSON org chart with a specific configuration and character set
///
/// # Example
/// ```rust
/// use tierchart::{render_with_style, CharacterSet, ChartConfig};
///
/// // Pure ASCII for maximum compatibility
/// let config = ChartConfig::default();
/// let ascii = render_with_style(r#"{"title": "CEO"}"#, &config, CharacterSet::Ascii).unwrap();
/// assert!(ascii.is_ascii());
/// ```
pub fn render_with_style(
    input: &str,
    config: &ChartConfig,
    style: CharacterSet,
) -> anyhow::Result<String> {
    let layout = layout_with_config(input, config)?;
    Ok(ChartRenderer::with_style(style).render(&layout)?)
}

/// Parse a JSON org chart without laying it out
///
/// # Example
/// ```rust
/// use tierchart::parse;
///
/// let root = parse(r#"{"title": "CEO", "children": [{"title": "CTO"}]}"#).unwrap();
/// assert_eq!(root.node_count(), 2);
/// assert_eq!(root.edge_count(), 1);
/// ```
pub fn parse(input: &str) -> anyhow::Result<OrgNode> {
    Ok(ChartParser::new().parse(input)?)
}
