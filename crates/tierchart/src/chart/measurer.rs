//! Box measurement
//!
//! Asks the [`MeasurementService`] for every box's size, level by level, and
//! records a [`Placement`] per node. Tops are relative to the measuring pass
//! and get normalized by the engine; lefts are filled by
//! [`solve_positions`], which runs as the last step here.

use tracing::{debug, info, span, trace, Level};

use super::levels::{ConnectedNode, LevelMap};
use super::positions::solve_positions;
use crate::core::{
    BoxClass, BoxRequest, BoxSize, ChartConfig, ChartError, MeasurementService, NodeId, Orientation,
    Placement, PlacementMap, Result,
};

/// Measure every node and solve horizontal positions
///
/// Horizontal levels share their width between boxes, large boxes getting
/// `large_org_size_multiplier` units. Vertical levels render each parent's
/// subtree as an indented stack, each depth `vertical_child_offset` narrower
/// than the one above. Nodes already measured as part of an earlier stack are
/// not measured again.
pub fn measure_boxes<M>(
    levels: &mut LevelMap,
    service: &M,
    config: &ChartConfig,
) -> Result<PlacementMap>
where
    M: MeasurementService + ?Sized,
{
    let measure_span = span!(
        Level::INFO,
        "measure_boxes",
        node_count = levels.node_count(),
        level_count = levels.level_count()
    );
    let _enter = measure_span.enter();

    let mut placements = PlacementMap::new();
    let mut cursor_y = 0.0;

    for index in levels.level_indices() {
        let Some(level) = levels.level(index) else {
            continue;
        };
        let orientation = level.orientation.ok_or_else(|| {
            ChartError::invariant(format!("level {} reached measurement unresolved", index))
        })?;

        let bottom = match orientation {
            Orientation::Horizontal => {
                measure_row(levels, index, service, config, cursor_y, &mut placements)?
            }
            Orientation::Vertical => {
                measure_stacks(levels, index, service, config, cursor_y, &mut placements)?
            }
        };
        if let Some(bottom) = bottom {
            cursor_y = bottom + config.vertical_spacing;
        }
    }

    debug!(measured = placements.len(), "Boxes measured");
    solve_positions(levels, &mut placements, config)?;

    info!(placements = placements.len(), "Measurement completed");
    Ok(placements)
}

fn measure_node<M>(
    service: &M,
    node: &ConnectedNode,
    class: BoxClass,
    width: f64,
) -> Result<BoxSize>
where
    M: MeasurementService + ?Sized,
{
    let request = BoxRequest {
        title: &node.title,
        subtitle: node.subtitle.as_deref(),
        class,
        width,
    };
    let size = service
        .measure(&request)
        .map_err(|e| ChartError::measurement(node.id, e))?;

    let valid = |v: f64| v.is_finite() && v >= 0.0;
    if !valid(size.width) || !valid(size.height) {
        return Err(ChartError::measurement(
            node.id,
            anyhow::anyhow!("reported size {}x{}", size.width, size.height),
        ));
    }
    trace!(
        node = node.id,
        %class,
        width,
        measured_width = size.width,
        height = size.height,
        "Measured box"
    );
    Ok(size)
}

/// Measure a horizontal level as one row; returns the row's bottom
fn measure_row<M>(
    levels: &LevelMap,
    index: i32,
    service: &M,
    config: &ChartConfig,
    top: f64,
    placements: &mut PlacementMap,
) -> Result<Option<f64>>
where
    M: MeasurementService + ?Sized,
{
    let Some(level) = levels.level(index) else {
        return Ok(None);
    };
    let ids: Vec<NodeId> = level
        .nodes
        .iter()
        .copied()
        .filter(|&id| !placements.contains(id))
        .collect();
    if ids.is_empty() {
        return Ok(None);
    }

    let skip_sides = level.left_skip_line as u8 + level.right_skip_line as u8;
    let real_available =
        config.available_space - config.skip_line_extra_spacing * skip_sides as f64;

    let large_count = ids.iter().filter(|&&id| levels.node(id).large).count();
    let normal_count = ids.len() - large_count;
    let total_units = large_count as f64 * config.large_org_size_multiplier + normal_count as f64;
    let unit_width =
        (real_available - (total_units - 1.0) * config.horizontal_spacing) / total_units;

    let mut sizes = Vec::with_capacity(ids.len());
    for &id in &ids {
        let node = levels.node(id);
        let (class, units) = if node.large {
            (BoxClass::Large, config.large_org_size_multiplier)
        } else {
            (BoxClass::Normal, 1.0)
        };
        let width = config.clamp_col_width(unit_width * units);
        sizes.push((id, measure_node(service, node, class, width)?));
    }

    let row_height = sizes
        .iter()
        .map(|(_, size)| size.height)
        .fold(0.0, f64::max);
    // One size class per row: every box takes the row height
    let uniform = large_count == 0 || normal_count == 0;

    for (id, size) in sizes {
        let placement = if uniform {
            Placement::new(size.width, row_height, top)
        } else {
            Placement::new(size.width, size.height, top + (row_height - size.height) / 2.0)
        };
        placements.insert(id, placement);
    }

    debug!(
        level = index,
        boxes = ids.len(),
        unit_width,
        row_height,
        uniform,
        "Measured horizontal level"
    );
    Ok(Some(top + row_height))
}

/// Measure the unplaced nodes of a vertical level with their whole subtrees
///
/// Entries are grouped by parent; each group is a column of its own, so all
/// groups start at `top`. Returns the lowest bottom, if anything was placed.
fn measure_stacks<M>(
    levels: &LevelMap,
    index: i32,
    service: &M,
    config: &ChartConfig,
    top: f64,
    placements: &mut PlacementMap,
) -> Result<Option<f64>>
where
    M: MeasurementService + ?Sized,
{
    let Some(level) = levels.level(index) else {
        return Ok(None);
    };

    let mut groups: Vec<(Option<NodeId>, Vec<NodeId>)> = Vec::new();
    for &id in &level.nodes {
        if placements.contains(id) {
            continue;
        }
        let parent = levels.node(id).parent;
        match groups.iter_mut().find(|(p, _)| *p == parent) {
            Some((_, members)) => members.push(id),
            None => groups.push((parent, vec![id])),
        }
    }
    if groups.is_empty() {
        trace!(level = index, "Vertical level already measured");
        return Ok(None);
    }

    let offset = config.vertical_child_offset;
    let mut bottom: Option<f64> = None;

    for (parent, entries) in &groups {
        let entry_width = match parent.and_then(|p| placements.get(p)) {
            Some(parent_box) => parent_box.width - offset,
            None => config.available_space.min(config.max_col_width),
        }
        .max(1.0);

        let mut y = top;
        for &entry in entries {
            // Pre-order so each box sits directly above its first child
            let mut stack = vec![(entry, entry_width)];
            while let Some((id, width)) = stack.pop() {
                if placements.contains(id) {
                    continue;
                }
                let size = measure_node(service, levels.node(id), BoxClass::Stacked, width)?;
                placements.insert(id, Placement::new(size.width, size.height, y));
                bottom = Some(bottom.map_or(y + size.height, |b: f64| b.max(y + size.height)));
                y += size.height + config.vertical_subtree_spacing;

                let child_width = (size.width - offset).max(1.0);
                for &child in levels.children(id).iter().rev() {
                    stack.push((child, child_width));
                }
            }
        }
    }

    debug!(level = index, groups = groups.len(), ?bottom, "Measured vertical stacks");
    Ok(bottom)
}
