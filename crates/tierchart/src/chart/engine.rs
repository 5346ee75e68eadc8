//! Layout engine: the single recompute entry point
//!
//! Runs leveler → orientation resolver → measurer (which solves positions)
//! → top normalization → connector router. Each call starts from the input
//! tree alone and keeps nothing afterwards, so repeated calls on the same
//! input give the same layout.

use serde::Serialize;
use tracing::{debug, info, span, Level};

use super::connectors::route_lines;
use super::leveler::levelize;
use super::levels::LevelMap;
use super::measurer::measure_boxes;
use super::orientation::resolve_orientations;
use super::parser::OrgNode;
use crate::core::{
    BoxClass, BoxSize, CellMeasurer, ChartConfig, ChartError, Interval, Line, MeasurementService,
    NodeId, Orientation, PlacementMap, Result,
};

/// Lays out org charts with one configuration and measurement service
#[derive(Debug, Clone)]
pub struct ChartLayoutEngine<M> {
    config: ChartConfig,
    measurer: M,
}

impl ChartLayoutEngine<CellMeasurer> {
    /// Engine measuring in terminal cells
    pub fn with_cells(config: ChartConfig) -> Result<Self> {
        Self::new(config, CellMeasurer::new())
    }
}

impl Default for ChartLayoutEngine<CellMeasurer> {
    fn default() -> Self {
        Self {
            config: ChartConfig::default(),
            measurer: CellMeasurer::new(),
        }
    }
}

impl<M: MeasurementService> ChartLayoutEngine<M> {
    /// Create an engine; the configuration is validated once here
    pub fn new(config: ChartConfig, measurer: M) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, measurer })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Lay out `root` from scratch
    ///
    /// Fails with [`ChartError::MeasurementFailure`] when the measurement
    /// service does, and with [`ChartError::InvalidInput`] when weights push
    /// a node out of the level range; no partial layout is returned.
    pub fn recompute(&self, root: &OrgNode) -> Result<ChartLayout> {
        let recompute_span = span!(
            Level::INFO,
            "recompute",
            node_count = root.node_count(),
            available_space = self.config.available_space
        );
        let _enter = recompute_span.enter();

        let mut levels = levelize(root)?;
        resolve_orientations(&mut levels, &self.config);
        let mut placements = measure_boxes(&mut levels, &self.measurer, &self.config)?;
        normalize_tops(&mut placements);
        let lines = route_lines(&levels, &placements, &self.config)?;

        info!(
            nodes = placements.len(),
            levels = levels.level_count(),
            lines = lines.len(),
            "Layout completed"
        );
        Ok(ChartLayout {
            levels,
            placements,
            lines,
        })
    }
}

/// Shift every box up so the topmost one starts at 0
fn normalize_tops(placements: &mut PlacementMap) {
    let min_top = placements
        .iter()
        .map(|(_, placement)| placement.top)
        .fold(f64::INFINITY, f64::min);
    if !min_top.is_finite() || min_top == 0.0 {
        return;
    }
    debug!(min_top, "Normalizing tops");
    for placement in placements.values_mut() {
        placement.top -= min_top;
    }
}

/// Output of one layout run
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub levels: LevelMap,
    pub placements: PlacementMap,
    pub lines: Vec<Line>,
}

impl ChartLayout {
    /// Smallest size that holds every box and connector, from the origin
    pub fn extent(&self) -> BoxSize {
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;
        for (_, placement) in self.placements.iter() {
            if let Some(right) = placement.right() {
                width = width.max(right);
            }
            height = height.max(placement.bottom());
        }
        for point in self.lines.iter().flat_map(|line| line.points.iter()) {
            width = width.max(point.x);
            height = height.max(point.y);
        }
        BoxSize::new(width, height)
    }

    /// Styling class a node was measured with
    pub fn box_class(&self, id: NodeId) -> BoxClass {
        let node = self.levels.node(id);
        if self.levels.is_vertical(node.level) {
            BoxClass::Stacked
        } else if node.large {
            BoxClass::Large
        } else {
            BoxClass::Normal
        }
    }

    /// Flatten into a serializable report
    pub fn to_report(&self) -> Result<LayoutReport> {
        let mut nodes = Vec::with_capacity(self.levels.node_count());
        for node in self.levels.nodes() {
            let placement = self.placements.require(node.id)?;
            let orientation = self.levels.orientation(node.level).ok_or_else(|| {
                ChartError::invariant(format!("level {} has no orientation", node.level))
            })?;
            nodes.push(NodeReport {
                id: node.id,
                title: node.title.clone(),
                subtitle: node.subtitle.clone(),
                parent: node.parent,
                level: node.level,
                orientation,
                class: self.box_class(node.id).as_str(),
                left: self.placements.require_left(node.id)?,
                top: placement.top,
                width: placement.width,
                height: placement.height,
            });
        }

        let mut levels = Vec::with_capacity(self.levels.level_count());
        for level in self.levels.levels() {
            let orientation = level.orientation.ok_or_else(|| {
                ChartError::invariant(format!("level {} has no orientation", level.index))
            })?;
            levels.push(LevelReport {
                index: level.index,
                orientation,
                nodes: level.nodes.clone(),
                left_skip_line: level.left_skip_line,
                right_skip_line: level.right_skip_line,
                empty_spaces: level.empty_spaces.clone(),
            });
        }

        let extent = self.extent();
        Ok(LayoutReport {
            width: extent.width,
            height: extent.height,
            nodes,
            levels,
            lines: self.lines.clone(),
        })
    }
}

/// Serializable view of a [`ChartLayout`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReport {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeReport>,
    pub levels: Vec<LevelReport>,
    pub lines: Vec<Line>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    pub id: NodeId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub parent: Option<NodeId>,
    pub level: i32,
    pub orientation: Orientation,
    pub class: &'static str,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelReport {
    pub index: i32,
    pub orientation: Orientation,
    pub nodes: Vec<NodeId>,
    pub left_skip_line: bool,
    pub right_skip_line: bool,
    pub empty_spaces: Vec<Interval>,
}
