//! Core type definitions for chart layout
//!
//! Geometry shared by every stage of the pipeline: node identities, points,
//! connector polylines, per-node placements, and the per-level orientation tag.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::{ChartError, Result};

/// Identity of a node inside one layout run
///
/// Ids are dense indices into the run's node arena and are assigned in
/// pre-order. They are only meaningful within the run that produced them.
pub type NodeId = usize;

/// Character set for the ASCII preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CharacterSet {
    /// Pure ASCII characters only: - | +
    Ascii,
    /// Unicode box-drawing characters: ┌ ┐ └ ┘ ─ │ ╔ ═
    #[default]
    Unicode,
}

impl CharacterSet {
    /// Returns true if this character set uses only ASCII
    pub fn is_ascii(&self) -> bool {
        matches!(self, CharacterSet::Ascii)
    }
}

impl fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacterSet::Ascii => write!(f, "ascii"),
            CharacterSet::Unicode => write!(f, "unicode"),
        }
    }
}

/// Layout mode of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Siblings side by side
    Horizontal,
    /// Siblings stacked and indented under their parent
    Vertical,
}

impl Orientation {
    pub fn is_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => write!(f, "horizontal"),
            Orientation::Vertical => write!(f, "vertical"),
        }
    }
}

/// A 2-D point in layout units
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One parent→child connector, as an ordered polyline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub points: Vec<Point>,
}

impl Line {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Half-open horizontal interval `[start, end)` of unused space in a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// Size and position of one node's box
///
/// `left` stays `None` until the position solver has run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
    pub top: f64,
    pub left: Option<f64>,
}

impl Placement {
    pub fn new(width: f64, height: f64, top: f64) -> Self {
        Self {
            width,
            height,
            top,
            left: None,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Right edge, if the box has been placed
    pub fn right(&self) -> Option<f64> {
        self.left.map(|left| left + self.width)
    }

    /// Horizontal center, if the box has been placed
    pub fn center_x(&self) -> Option<f64> {
        self.left.map(|left| left + self.width / 2.0)
    }
}

/// Placements of one run, keyed by node id
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlacementMap {
    entries: BTreeMap<NodeId, Placement>,
}

impl PlacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: NodeId, placement: Placement) {
        self.entries.insert(id, placement);
    }

    pub fn get(&self, id: NodeId) -> Option<&Placement> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Placement> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Look up a placement that earlier stages must have produced
    pub fn require(&self, id: NodeId) -> Result<&Placement> {
        self.entries
            .get(&id)
            .ok_or_else(|| ChartError::invariant(format!("node {} has no placement", id)))
    }

    pub fn require_mut(&mut self, id: NodeId) -> Result<&mut Placement> {
        self.entries
            .get_mut(&id)
            .ok_or_else(|| ChartError::invariant(format!("node {} has no placement", id)))
    }

    /// Left edge of a node that the position solver must already have placed
    pub fn require_left(&self, id: NodeId) -> Result<f64> {
        self.require(id)?
            .left
            .ok_or_else(|| ChartError::invariant(format!("node {} was never positioned", id)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Placement)> {
        self.entries.iter().map(|(id, placement)| (*id, placement))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Placement> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
