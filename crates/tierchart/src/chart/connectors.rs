//! Connector routing
//!
//! One polyline per parent→child edge. Four shapes:
//!
//! - same level: a straight segment between the two box centers
//! - skip: leaves the parent sideways to a free gap (or the level edge),
//!   runs down past the skipped levels, then elbows into the child
//! - into a vertical stack: an "L" down the parent's indent line
//! - default: a "Z" from the parent's bottom to the child's top

use tracing::{debug, span, trace, Level};

use super::levels::LevelMap;
use crate::core::{ChartConfig, Line, NodeId, PlacementMap, Point, Result};

/// Below this, two x coordinates are the same column
const SAME_X_EPSILON: f64 = 1e-9;

/// Route every edge, depth-first from the root, children in order
pub fn route_lines(
    levels: &LevelMap,
    placements: &PlacementMap,
    config: &ChartConfig,
) -> Result<Vec<Line>> {
    let route_span = span!(Level::INFO, "route_lines", edge_count = levels.edge_count());
    let _enter = route_span.enter();

    let mut lines = Vec::with_capacity(levels.edge_count());
    let mut stack = vec![levels.root()];
    while let Some(parent) = stack.pop() {
        let children = levels.children(parent);
        for &child in children {
            lines.push(route_edge(levels, placements, config, parent, child)?);
        }
        stack.extend(children.iter().rev());
    }

    debug!(lines = lines.len(), "Connector routing completed");
    Ok(lines)
}

/// Route the single connector from `parent` to `child`
pub fn route_edge(
    levels: &LevelMap,
    placements: &PlacementMap,
    config: &ChartConfig,
    parent: NodeId,
    child: NodeId,
) -> Result<Line> {
    let parent_box = placements.require(parent)?;
    let child_box = placements.require(child)?;
    let parent_x = placements.require_left(parent)? + parent_box.width / 2.0;
    let child_x = placements.require_left(child)? + child_box.width / 2.0;

    let parent_node = levels.node(parent);
    let child_node = levels.node(child);

    if parent_node.level == child_node.level {
        trace!(parent, child, "Same-level connector");
        return Ok(Line::new(vec![
            Point::new(parent_x, parent_box.center_y()),
            Point::new(child_x, child_box.center_y()),
        ]));
    }

    let child_vertical = levels.is_vertical(child_node.level);
    let mid_gap = if child_vertical {
        config.vertical_subtree_spacing
    } else {
        config.vertical_spacing
    };
    let mid_y = child_box.top - mid_gap / 2.0;

    if parent_node.skips_levels() > 0 && child_node.level > parent_node.level + 1 {
        let start_x = skip_start_x(levels, config, parent, parent_x);
        trace!(parent, child, start_x, "Skip connector");

        let mut points = Vec::with_capacity(5);
        if (start_x - parent_x).abs() > SAME_X_EPSILON {
            points.push(Point::new(parent_x, parent_box.center_y()));
        }
        points.extend([
            Point::new(start_x, parent_box.center_y()),
            Point::new(start_x, mid_y),
            Point::new(child_x, mid_y),
            Point::new(child_x, child_box.top),
        ]);
        return Ok(Line::new(points));
    }

    if child_vertical {
        let indent_x = placements.require_left(parent)? + config.vertical_child_offset / 2.0;
        return Ok(Line::new(vec![
            Point::new(indent_x, parent_box.bottom()),
            Point::new(indent_x, child_box.center_y()),
            Point::new(child_x, child_box.center_y()),
        ]));
    }

    Ok(Line::new(vec![
        Point::new(parent_x, parent_box.bottom()),
        Point::new(parent_x, mid_y),
        Point::new(child_x, mid_y),
        Point::new(child_x, child_box.top),
    ]))
}

/// Column a skip connector runs down
///
/// Prefers the gap in the level below whose center is nearest the parent.
/// When that level reserves an edge margin, the first and last nodes of the
/// parent's level use the margin on their side; anyone else goes straight
/// down. With no level directly below there is nothing to avoid.
fn skip_start_x(levels: &LevelMap, config: &ChartConfig, parent: NodeId, parent_x: f64) -> f64 {
    let parent_level = levels.node(parent).level;
    let Some(next) = levels.level(parent_level + 1) else {
        return parent_x;
    };

    if !next.has_skip_line() {
        let nearest = next.empty_spaces.iter().min_by(|a, b| {
            (a.center() - parent_x)
                .abs()
                .total_cmp(&(b.center() - parent_x).abs())
        });
        if let Some(gap) = nearest {
            return gap.center();
        }
    }

    let margin = config.skip_line_extra_spacing / 2.0;
    let row = levels
        .level(parent_level)
        .map(|level| level.nodes.as_slice())
        .unwrap_or_default();
    if row.first() == Some(&parent) {
        margin
    } else if row.last() == Some(&parent) {
        config.available_space - margin
    } else {
        parent_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::leveler::levelize;
    use crate::chart::measurer::measure_boxes;
    use crate::chart::orientation::resolve_orientations;
    use crate::chart::parser::OrgNode;
    use crate::core::{BoxRequest, BoxSize, ChartError};

    fn fixed(req: &BoxRequest<'_>) -> anyhow::Result<BoxSize> {
        Ok(BoxSize::new(req.width, 3.0))
    }

    fn routed(root: &OrgNode, config: &ChartConfig) -> (LevelMap, PlacementMap, Vec<Line>) {
        let mut levels = levelize(root).unwrap();
        resolve_orientations(&mut levels, config);
        let placements = measure_boxes(&mut levels, &fixed, config).unwrap();
        let lines = route_lines(&levels, &placements, config).unwrap();
        (levels, placements, lines)
    }

    #[test]
    fn test_no_children_no_lines() {
        let (_, _, lines) = routed(&OrgNode::new("R"), &ChartConfig::default());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_default_z_elbow() {
        let (_, placements, lines) = routed(
            &OrgNode::new("R").with_child(OrgNode::new("A")),
            &ChartConfig::default(),
        );
        let parent = placements.get(0).unwrap();
        let child = placements.get(1).unwrap();
        let points = &lines[0].points;
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Point::new(parent.center_x().unwrap(), parent.bottom()));
        assert_eq!(points[1].y, child.top - 2.0);
        assert_eq!(points[3], Point::new(child.center_x().unwrap(), child.top));
    }

    #[test]
    fn test_same_level_straight() {
        let root = OrgNode::new("R").with_child(OrgNode::new("A").with_weight(-1));
        let (_, placements, lines) = routed(&root, &ChartConfig::default());
        let a = placements.get(1).unwrap();
        assert_eq!(lines[0].points.len(), 2);
        assert_eq!(lines[0].end(), Some(Point::new(a.center_x().unwrap(), a.center_y())));
    }

    #[test]
    fn test_vertical_child_elbow() {
        let config = ChartConfig::default().with_available_space(20.0);
        let root = OrgNode::new("R").with_children(vec![OrgNode::new("A"), OrgNode::new("B")]);
        let (_, placements, lines) = routed(&root, &config);
        let parent = placements.get(0).unwrap();
        let child = placements.get(2).unwrap();
        let points = &lines[1].points;
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].x, parent.left.unwrap() + 2.0);
        assert_eq!(points[1].y, child.center_y());
    }

    #[test]
    fn test_root_skip_through_gap() {
        // a full root level reserves no margin, so the line uses level 1's gaps
        let root = OrgNode::new("R").with_children(vec![
            OrgNode::new("A").with_weight(-1),
            OrgNode::new("B").with_weight(-1),
            OrgNode::new("C").with_weight(1),
            OrgNode::new("D"),
        ]);
        let (levels, placements, lines) = routed(&root, &ChartConfig::default());
        assert_eq!(levels.node(0).skips_levels(), 1);
        assert!(!levels.level(1).unwrap().has_skip_line());

        let line = &lines[2];
        assert_eq!(line.points.len(), 5);
        let column = line.points[1].x;
        assert!(levels
            .level(1)
            .unwrap()
            .empty_spaces
            .iter()
            .any(|gap| gap.center() == column));
        let child = placements.get(3).unwrap();
        assert_eq!(line.end(), Some(Point::new(child.center_x().unwrap(), child.top)));
    }

    #[test]
    fn test_skip_along_left_margin() {
        let root = OrgNode::new("R").with_children(vec![
            OrgNode::new("A").with_child(OrgNode::new("a")),
            OrgNode::new("B").with_child(OrgNode::new("b").with_weight(1)),
        ]);
        let config = ChartConfig::default();
        let (levels, _, lines) = routed(&root, &config);
        // B moved to the front of its level and flagged the left edge
        assert_eq!(levels.level(1).unwrap().nodes, vec![3, 1]);

        // R's edges come first, then A's, then B's
        let line = &lines[3];
        assert_eq!(line.points[1].x, config.skip_line_extra_spacing / 2.0);
        assert_eq!(line.points[2].x, config.skip_line_extra_spacing / 2.0);
    }

    #[test]
    fn test_missing_placement_is_invariant_violation() {
        let config = ChartConfig::default();
        let (levels, _, _) = routed(&OrgNode::new("R").with_child(OrgNode::new("A")), &config);
        let err = route_lines(&levels, &PlacementMap::new(), &config).unwrap_err();
        assert!(matches!(err, ChartError::InvariantViolation { .. }));
    }
}
