//! Orientation resolution
//!
//! Decides per level whether boxes sit side by side or stack vertically,
//! then repairs everything that decision invalidates: levels below a
//! vertical one, weight-shifted nodes inside vertical runs, sibling order,
//! and the edge margins skip connectors need.

use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info, span, trace, Level};

use super::levels::LevelMap;
use crate::core::{ChartConfig, NodeId, Orientation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Resolve orientations and skip-line margins in place
///
/// Passes, in order:
/// 1. a level is vertical when its nodes cannot get `min_col_width` each
/// 2. verticality propagates to every level a vertical level has children in
/// 3. weight-shifted nodes in vertical levels move back under their parent
/// 4. every level is re-sorted by sibling index
/// 5. horizontal levels with skipping connectors reserve edge margins
pub fn resolve_orientations(levels: &mut LevelMap, config: &ChartConfig) {
    let resolve_span = span!(
        Level::INFO,
        "resolve_orientations",
        level_count = levels.level_count(),
        available_space = config.available_space
    );
    let _enter = resolve_span.enter();

    assign_by_width(levels, config);
    propagate_vertical(levels);
    correct_weighted_levels(levels);
    restore_sibling_order(levels);
    reserve_skip_line_margins(levels, config);

    let vertical = levels.levels().filter(|l| l.is_vertical()).count();
    info!(
        level_count = levels.level_count(),
        vertical_levels = vertical,
        "Orientation resolution completed"
    );
}

fn assign_by_width(levels: &mut LevelMap, config: &ChartConfig) {
    for level in levels.levels_mut() {
        let required = level.nodes.len().max(1) as f64 * config.min_col_width;
        let vertical = config.min_col_width <= 0.0
            || config.max_col_width <= 0.0
            || required > config.available_space;
        let orientation = if vertical {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
        trace!(level = level.index, required, %orientation, "Assigned orientation");
        level.orientation = Some(orientation);
    }
}

/// Levels holding at least one child of a node in level `index`
fn child_levels(levels: &LevelMap, index: i32) -> BTreeSet<i32> {
    levels
        .level(index)
        .map(|level| {
            level
                .nodes
                .iter()
                .flat_map(|&id| levels.node(id).children.iter())
                .map(|&child| levels.node(child).level)
                .collect()
        })
        .unwrap_or_default()
}

fn propagate_vertical(levels: &mut LevelMap) {
    let sources: Vec<i32> = levels
        .levels()
        .filter(|level| level.is_vertical())
        .map(|level| level.index)
        .collect();
    let mut visited: BTreeSet<i32> = sources.iter().copied().collect();
    let mut queue: VecDeque<i32> = sources.into();

    while let Some(index) = queue.pop_front() {
        for target in child_levels(levels, index) {
            if !visited.insert(target) {
                continue;
            }
            if let Some(level) = levels.level_mut(target) {
                if !level.is_vertical() {
                    debug!(from = index, level = target, "Forcing level vertical");
                }
                level.orientation = Some(Orientation::Vertical);
            }
            queue.push_back(target);
        }
    }

    // Stacked runs connect with indent elbows, never with skip routing
    for index in visited {
        clear_skip_routing(levels, index);
    }
}

fn clear_skip_routing(levels: &mut LevelMap, index: i32) {
    let ids: Vec<NodeId> = match levels.level_mut(index) {
        Some(level) => {
            level.left_skip_line = false;
            level.right_skip_line = false;
            level.nodes.clone()
        }
        None => return,
    };
    for id in ids {
        levels.node_mut(id).line_skips_levels = None;
    }
}

fn correct_weighted_levels(levels: &mut LevelMap) {
    for index in levels.level_indices() {
        if !levels.is_vertical(index) {
            continue;
        }
        let ids = levels
            .level(index)
            .map(|level| level.nodes.clone())
            .unwrap_or_default();

        for id in ids {
            let Some(parent) = levels.node(id).parent else {
                continue;
            };
            let target = levels.node(parent).level + 1;
            if levels.node(id).level != target && levels.is_vertical(target) {
                debug!(node = id, from = index, to = target, "Moving node under its parent");
                levels.move_node(id, target);
            }
        }
    }

    let pruned = levels.prune_empty();
    if pruned > 0 {
        debug!(pruned, "Removed levels emptied by weight correction");
    }
}

fn restore_sibling_order(levels: &mut LevelMap) {
    for index in levels.level_indices() {
        let Some(level) = levels.level(index) else {
            continue;
        };
        let mut ids = level.nodes.clone();
        // Stable: nodes sharing a sibling index keep their relative order
        ids.sort_by_key(|&id| levels.node(id).original_index);
        if let Some(level) = levels.level_mut(index) {
            level.nodes = ids;
        }
    }
}

fn reserve_skip_line_margins(levels: &mut LevelMap, config: &ChartConfig) {
    let root_level = levels.root_level();

    for index in levels.level_indices() {
        let skipping: Vec<NodeId> = match levels.level(index) {
            Some(level) if level.is_horizontal() => level
                .nodes
                .iter()
                .copied()
                .filter(|&id| levels.node(id).skips_levels() > 0)
                .collect(),
            _ => continue,
        };
        if skipping.is_empty() {
            continue;
        }

        if index == root_level {
            reserve_root_margin(levels, index, config);
            continue;
        }

        let first = skipping[0];
        let last = if skipping.len() > 1 {
            skipping.last().copied()
        } else {
            None
        };

        if let Some(level) = levels.level_mut(index) {
            level.nodes.retain(|&id| id != first && Some(id) != last);
            level.nodes.insert(0, first);
            if let Some(last) = last {
                level.nodes.push(last);
            }
        }

        let span = levels.node(first).skips_levels();
        mark_skip_side(levels, index, span, Side::Left);
        if let Some(last) = last {
            let span = levels.node(last).skips_levels();
            mark_skip_side(levels, index, span, Side::Right);
        }
    }
}

/// Only the root itself may route along an edge, and only with room to spare
fn reserve_root_margin(levels: &mut LevelMap, index: i32, config: &ChartConfig) {
    let root = levels.root();
    let span = levels.node(root).skips_levels();
    if span == 0 {
        return;
    }

    let count = levels.level(index).map_or(0, |level| level.nodes.len());
    let footprint = count as f64 * config.max_col_width
        + count.saturating_sub(1) as f64 * config.horizontal_spacing;
    if config.available_space <= footprint {
        debug!(footprint, "No room beside the root level for a skip line");
        return;
    }

    // A second root-level node sits to the right, a third to the left
    match count {
        1 | 2 => mark_skip_side(levels, index, span, Side::Left),
        _ => debug!("Root is flanked on both sides, no skip margin"),
    }
}

fn mark_skip_side(levels: &mut LevelMap, from: i32, span: u32, side: Side) {
    let to = from.saturating_add_unsigned(span);
    for level in levels.levels_in_range_mut(from..=to) {
        match side {
            Side::Left => level.left_skip_line = true,
            Side::Right => level.right_skip_line = true,
        }
    }
    trace!(from, to, ?side, "Reserved skip line margin");
}
