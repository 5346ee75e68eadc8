//! Horizontal position solving
//!
//! Fills in `left` for every placement and records each level's unused
//! horizontal gaps, which skip connectors later route through.

use tracing::{debug, info, span, trace, Level};

use super::levels::LevelMap;
use crate::core::{ChartConfig, ChartError, Interval, NodeId, Orientation, PlacementMap, Result};

/// Gaps this narrow or narrower are rounding noise, not space
pub const GAP_TOLERANCE: f64 = 1.0;

/// Solve the left offset of every measured box
///
/// The root level (when horizontal) centers the root, puts the second node
/// to its right and the third to its left, then shifts the row into
/// `[0, available_space]`. Horizontal levels center each sibling group
/// under its parent and push the outermost groups apart when groups collide.
/// Vertical stacks indent `vertical_child_offset` per depth from their
/// parent's left edge.
pub fn solve_positions(
    levels: &mut LevelMap,
    placements: &mut PlacementMap,
    config: &ChartConfig,
) -> Result<()> {
    let solve_span = span!(
        Level::INFO,
        "solve_positions",
        level_count = levels.level_count(),
        available_space = config.available_space
    );
    let _enter = solve_span.enter();

    let root_level = levels.root_level();
    if levels.orientation(root_level) == Some(Orientation::Horizontal) {
        place_root_level(levels, root_level, placements, config)?;
    }

    for index in levels.level_indices() {
        match levels.orientation(index) {
            Some(Orientation::Horizontal) if index == root_level => {}
            Some(Orientation::Horizontal) => place_row(levels, index, placements, config)?,
            Some(Orientation::Vertical) => place_stacks(levels, index, placements, config)?,
            None => {
                return Err(ChartError::invariant(format!(
                    "level {} reached position solving unresolved",
                    index
                )))
            }
        }
    }

    info!(placed = placements.len(), "Position solving completed");
    Ok(())
}

/// Unused intervals of `[0, extent]` around the given `(left, right)` boxes
///
/// Boxes may arrive in any order and may overlap. Gaps no wider than
/// [`GAP_TOLERANCE`] are dropped.
pub fn empty_spaces(boxes: &[(f64, f64)], extent: f64) -> Vec<Interval> {
    let mut sorted = boxes.to_vec();
    sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut spaces = Vec::new();
    let mut cursor = 0.0_f64;
    for (left, right) in sorted {
        if left - cursor > GAP_TOLERANCE {
            spaces.push(Interval::new(cursor, left));
        }
        cursor = cursor.max(right);
    }
    if extent - cursor > GAP_TOLERANCE {
        spaces.push(Interval::new(cursor, extent));
    }
    spaces
}

fn record_empty_spaces(
    levels: &mut LevelMap,
    index: i32,
    placements: &PlacementMap,
    config: &ChartConfig,
) -> Result<()> {
    let ids = levels
        .level(index)
        .map(|level| level.nodes.clone())
        .unwrap_or_default();

    let mut boxes = Vec::with_capacity(ids.len());
    for id in ids {
        let left = placements.require_left(id)?;
        boxes.push((left, left + placements.require(id)?.width));
    }

    let spaces = empty_spaces(&boxes, config.available_space);
    trace!(level = index, gaps = spaces.len(), "Recorded empty spaces");
    if let Some(level) = levels.level_mut(index) {
        level.empty_spaces = spaces;
    }
    Ok(())
}

/// Shift that moves `[min, max]` inside `[lower, upper]`
///
/// Content wider than the bounds is pinned to `lower`.
fn fit_shift(min: f64, max: f64, lower: f64, upper: f64) -> f64 {
    if max - min > upper - lower || min < lower {
        lower - min
    } else if max > upper {
        upper - max
    } else {
        0.0
    }
}

fn place_root_level(
    levels: &mut LevelMap,
    index: i32,
    placements: &mut PlacementMap,
    config: &ChartConfig,
) -> Result<()> {
    let ids = levels
        .level(index)
        .map(|level| level.nodes.clone())
        .unwrap_or_default();
    let Some((&first, rest)) = ids.split_first() else {
        return Ok(());
    };

    let spacing = config.horizontal_spacing;
    let first_width = placements.require(first)?.width;
    let first_left = (config.available_space - first_width) / 2.0;
    placements.require_mut(first)?.left = Some(first_left);

    let mut rightmost = first_left + first_width;
    for (position, &id) in rest.iter().enumerate() {
        let width = placements.require(id)?.width;
        let left = if position == 1 {
            // the third node goes to the left of the first
            first_left - (width + spacing)
        } else {
            let left = rightmost + spacing;
            rightmost = left + width;
            left
        };
        placements.require_mut(id)?.left = Some(left);
    }

    let (min, max) = extent_of(&ids, placements)?;
    let shift = fit_shift(min, max, 0.0, config.available_space);
    if shift != 0.0 {
        debug!(shift, "Shifting root level into bounds");
        shift_nodes(&ids, shift, placements)?;
    }

    record_empty_spaces(levels, index, placements, config)?;
    debug!(level = index, nodes = ids.len(), "Placed root level");
    Ok(())
}

fn extent_of(ids: &[NodeId], placements: &PlacementMap) -> Result<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &id in ids {
        let left = placements.require_left(id)?;
        min = min.min(left);
        max = max.max(left + placements.require(id)?.width);
    }
    Ok((min, max))
}

fn shift_nodes(ids: &[NodeId], shift: f64, placements: &mut PlacementMap) -> Result<()> {
    for &id in ids {
        let placement = placements.require_mut(id)?;
        placement.left = placement.left.map(|left| left + shift);
    }
    Ok(())
}

/// A parent's children laid out side by side
struct SiblingGroup {
    members: Vec<NodeId>,
    left: f64,
    width: f64,
}

fn place_row(
    levels: &mut LevelMap,
    index: i32,
    placements: &mut PlacementMap,
    config: &ChartConfig,
) -> Result<()> {
    let Some(level) = levels.level(index) else {
        return Ok(());
    };
    let spacing = config.horizontal_spacing;
    let lower = if level.left_skip_line {
        config.skip_line_extra_spacing
    } else {
        0.0
    };
    let upper = if level.right_skip_line {
        config.available_space - config.skip_line_extra_spacing
    } else {
        config.available_space
    };

    let mut by_parent: Vec<(Option<NodeId>, Vec<NodeId>)> = Vec::new();
    for &id in &level.nodes {
        let parent = levels.node(id).parent;
        match by_parent.iter_mut().find(|(p, _)| *p == parent) {
            Some((_, members)) => members.push(id),
            None => by_parent.push((parent, vec![id])),
        }
    }

    let mut groups = Vec::with_capacity(by_parent.len());
    for (parent, members) in by_parent {
        let mut width = spacing * members.len().saturating_sub(1) as f64;
        for &id in &members {
            width += placements.require(id)?.width;
        }

        let center = parent
            .and_then(|p| placements.get(p))
            .and_then(|p| p.center_x())
            .unwrap_or(config.available_space / 2.0);
        let desired = center - width / 2.0;
        let left = if width > upper - lower {
            lower
        } else {
            desired.clamp(lower, upper - width)
        };
        groups.push(SiblingGroup {
            members,
            left,
            width,
        });
    }

    groups.sort_by(|a, b| a.left.total_cmp(&b.left));

    let overlap: f64 = groups
        .windows(2)
        .map(|pair| (pair[0].left + pair[0].width + spacing - pair[1].left).max(0.0))
        .sum();
    if overlap > 0.0 && groups.len() > 1 {
        debug!(level = index, overlap, "Pushing outer sibling groups apart");
        let last = groups.len() - 1;
        groups[0].left -= overlap / 2.0;
        groups[last].left += overlap / 2.0;
    }

    let min = groups.iter().map(|g| g.left).fold(f64::INFINITY, f64::min);
    let max = groups
        .iter()
        .map(|g| g.left + g.width)
        .fold(f64::NEG_INFINITY, f64::max);
    let shift = fit_shift(min, max, lower, upper);

    for group in &groups {
        let mut x = group.left + shift;
        for &id in &group.members {
            let placement = placements.require_mut(id)?;
            placement.left = Some(x);
            x += placement.width + spacing;
        }
    }

    record_empty_spaces(levels, index, placements, config)?;
    debug!(level = index, groups = groups.len(), shift, "Placed horizontal level");
    Ok(())
}

fn place_stacks(
    levels: &mut LevelMap,
    index: i32,
    placements: &mut PlacementMap,
    config: &ChartConfig,
) -> Result<()> {
    let offset = config.vertical_child_offset;
    let Some(level) = levels.level(index) else {
        return Ok(());
    };
    let mut entries = Vec::new();
    for &id in &level.nodes {
        if placements.require(id)?.left.is_none() {
            entries.push(id);
        }
    }

    if !entries.is_empty() {
        let mut parents: Vec<Option<NodeId>> =
            entries.iter().map(|&id| levels.node(id).parent).collect();
        parents.sort();
        parents.dedup();
        let indent_under_parent = parents.len() > 1;

        for &entry in &entries {
            let entry_box = placements.require(entry)?;
            // placed meanwhile as a descendant of an earlier entry
            if entry_box.left.is_some() {
                continue;
            }
            let width = entry_box.width;
            let parent_left = levels
                .node(entry)
                .parent
                .and_then(|p| placements.get(p))
                .and_then(|p| p.left);
            let left = match parent_left {
                Some(parent_left) if indent_under_parent => parent_left + offset,
                _ => (config.available_space - width) / 2.0,
            };
            placements.require_mut(entry)?.left = Some(left);

            // Descendants were stacked with their entry; indent them in turn
            let mut stack: Vec<(NodeId, f64)> = levels
                .children(entry)
                .iter()
                .map(|&child| (child, left + offset))
                .collect();
            while let Some((id, left)) = stack.pop() {
                let placement = placements.require_mut(id)?;
                if placement.left.is_some() {
                    continue;
                }
                placement.left = Some(left);
                stack.extend(levels.children(id).iter().map(|&child| (child, left + offset)));
            }
        }
        debug!(
            level = index,
            entries = entries.len(),
            indent_under_parent,
            "Placed vertical stacks"
        );
    }

    if let Some(level) = levels.level_mut(index) {
        level.empty_spaces = vec![Interval::new(0.0, config.available_space)];
    }
    Ok(())
}
