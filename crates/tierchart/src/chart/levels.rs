//! Leveled tree: node arena plus per-level rows
//!
//! Nodes live in one arena addressed by [`NodeId`]; parents and children are
//! stored as ids, so the tree has no owning back-references. Levels are kept
//! in a `BTreeMap`, which makes every walk over them ascending.

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use crate::core::{Interval, NodeId, Orientation};

/// A tree node after leveling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectedNode {
    pub id: NodeId,
    pub title: String,
    pub subtitle: Option<String>,
    pub weight: i32,
    pub large: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Resolved level; rewritten by demotion and weight correction
    pub level: i32,
    /// Position among siblings at creation time (the root gets 0)
    pub original_index: usize,
    /// How many levels this node's connector to a child jumps over
    pub line_skips_levels: Option<u32>,
}

impl ConnectedNode {
    pub fn skips_levels(&self) -> u32 {
        self.line_skips_levels.unwrap_or(0)
    }
}

/// One horizontal tier of the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLevel {
    pub index: i32,
    /// Node ids in display order
    pub nodes: Vec<NodeId>,
    /// Unset until orientations are resolved
    pub orientation: Option<Orientation>,
    /// A skip connector hugs the left edge of this level
    pub left_skip_line: bool,
    /// A skip connector hugs the right edge of this level
    pub right_skip_line: bool,
    /// Unused horizontal intervals, filled in by the position solver
    pub empty_spaces: Vec<Interval>,
}

impl ChartLevel {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            nodes: Vec::new(),
            orientation: None,
            left_skip_line: false,
            right_skip_line: false,
            empty_spaces: Vec::new(),
        }
    }

    pub fn is_vertical(&self) -> bool {
        self.orientation == Some(Orientation::Vertical)
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Some(Orientation::Horizontal)
    }

    pub fn has_skip_line(&self) -> bool {
        self.left_skip_line || self.right_skip_line
    }
}

/// Leveled tree of one layout run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelMap {
    nodes: Vec<ConnectedNode>,
    levels: BTreeMap<i32, ChartLevel>,
    root: NodeId,
}

impl LevelMap {
    /// Build from an arena whose ids equal their indices
    pub(crate) fn from_arena(nodes: Vec<ConnectedNode>, root: NodeId) -> Self {
        let mut levels: BTreeMap<i32, ChartLevel> = BTreeMap::new();
        for node in &nodes {
            levels
                .entry(node.level)
                .or_insert_with(|| ChartLevel::new(node.level))
                .nodes
                .push(node.id);
        }
        Self {
            nodes,
            levels,
            root,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Level the root node sits in
    pub fn root_level(&self) -> i32 {
        self.nodes[self.root].level
    }

    /// Node by id; ids are only ever produced by this map
    pub fn node(&self, id: NodeId) -> &ConnectedNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ConnectedNode {
        &mut self.nodes[id]
    }

    pub fn get_node(&self, id: NodeId) -> Option<&ConnectedNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ConnectedNode> {
        self.nodes.iter()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<&ConnectedNode> {
        self.nodes[id].parent.map(|parent| &self.nodes[parent])
    }

    pub fn level(&self, index: i32) -> Option<&ChartLevel> {
        self.levels.get(&index)
    }

    pub fn level_mut(&mut self, index: i32) -> Option<&mut ChartLevel> {
        self.levels.get_mut(&index)
    }

    /// Levels in ascending order
    pub fn levels(&self) -> impl Iterator<Item = &ChartLevel> {
        self.levels.values()
    }

    pub fn levels_mut(&mut self) -> impl Iterator<Item = &mut ChartLevel> {
        self.levels.values_mut()
    }

    /// Existing levels whose index falls in `range`, ascending
    pub fn levels_in_range_mut(
        &mut self,
        range: RangeInclusive<i32>,
    ) -> impl Iterator<Item = &mut ChartLevel> {
        self.levels.range_mut(range).map(|(_, level)| level)
    }

    /// Level indices in ascending order
    pub fn level_indices(&self) -> Vec<i32> {
        self.levels.keys().copied().collect()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Orientation of the level `index`, if it exists and has been resolved
    pub fn orientation(&self, index: i32) -> Option<Orientation> {
        self.levels.get(&index).and_then(|level| level.orientation)
    }

    pub fn is_vertical(&self, index: i32) -> bool {
        self.orientation(index) == Some(Orientation::Vertical)
    }

    /// Move a node to another level, appending it to that level's row
    pub fn move_node(&mut self, id: NodeId, to: i32) {
        let from = self.nodes[id].level;
        if from == to {
            return;
        }
        if let Some(level) = self.levels.get_mut(&from) {
            level.nodes.retain(|&n| n != id);
        }
        self.levels
            .entry(to)
            .or_insert_with(|| ChartLevel::new(to))
            .nodes
            .push(id);
        self.nodes[id].level = to;
    }

    /// Drop levels left without nodes; returns how many were removed
    pub fn prune_empty(&mut self) -> usize {
        let before = self.levels.len();
        self.levels.retain(|_, level| !level.nodes.is_empty());
        before - self.levels.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of parent→child edges
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|node| node.children.len()).sum()
    }
}
