//! Org chart layout pipeline
//!
//! [`ChartParser`] turns JSON into an [`OrgNode`] tree; [`ChartLayoutEngine`]
//! runs the stages in order:
//!
//! 1. [`levelize`] assigns levels and demotes root-level overflow
//! 2. [`resolve_orientations`] picks horizontal or vertical per level
//! 3. [`measure_boxes`] sizes every box, then calls [`solve_positions`]
//! 4. [`route_lines`] draws one connector per edge
//!
//! [`ChartRenderer`] previews the result as text.

pub mod connectors;
pub mod engine;
pub mod leveler;
pub mod levels;
pub mod measurer;
pub mod orientation;
pub mod parser;
pub mod positions;
pub mod renderer;

pub use connectors::{route_edge, route_lines};
pub use engine::{ChartLayout, ChartLayoutEngine, LayoutReport, LevelReport, NodeReport};
pub use leveler::{levelize, MAX_ROOT_LEVEL_NODES};
pub use levels::{ChartLevel, ConnectedNode, LevelMap};
pub use measurer::measure_boxes;
pub use orientation::resolve_orientations;
pub use parser::{ChartParser, OrgNode};
pub use positions::{empty_spaces, solve_positions, GAP_TOLERANCE};
pub use renderer::ChartRenderer;
