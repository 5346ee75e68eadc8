//! Level assignment
//!
//! Turns the input tree into a [`LevelMap`]: pre-order ids, parent links,
//! weight-shifted levels, skip spans, and the three-node cap on the root
//! level.

use tracing::{debug, info, span, trace, Level};

use super::levels::{ConnectedNode, LevelMap};
use super::parser::OrgNode;
use crate::core::{ChartError, NodeId, Result};

/// Most nodes the root level may hold: the root and two of its children
pub const MAX_ROOT_LEVEL_NODES: usize = 3;

/// Largest level magnitude a node may land on
///
/// Later stages step one level past existing ones, so levels stay well
/// inside `i32`.
pub const MAX_LEVEL: i32 = i32::MAX / 2;

/// Assign ids, parents and levels to every node of `root`
///
/// A node's level is `parent_level + 1 + weight`; the root's is its own
/// weight. Ids are assigned in pre-order starting from 0 and are local to
/// this call. When a child lands more than one level below its parent, the
/// parent records the span it skips. A parent with several skipping
/// children keeps the span of the last one.
///
/// If the root level ends up with more than [`MAX_ROOT_LEVEL_NODES`]
/// nodes, the overflow moves one level down, in order.
///
/// Fails with [`ChartError::InvalidInput`] when weights push a node past
/// [`MAX_LEVEL`] in either direction.
pub fn levelize(root: &OrgNode) -> Result<LevelMap> {
    let level_span = span!(Level::INFO, "levelize", node_count = root.node_count());
    let _enter = level_span.enter();

    let mut arena: Vec<ConnectedNode> = Vec::new();

    // (input node, parent id, index among siblings)
    let mut stack: Vec<(&OrgNode, Option<NodeId>, usize)> = vec![(root, None, 0)];
    while let Some((input, parent, original_index)) = stack.pop() {
        let id = arena.len();
        let level = match parent {
            Some(parent_id) => arena[parent_id]
                .level
                .checked_add(1)
                .and_then(|natural| natural.checked_add(input.weight)),
            None => Some(input.weight),
        }
        .filter(|level| level.unsigned_abs() <= MAX_LEVEL as u32)
        .ok_or_else(|| {
            ChartError::invalid_input(format!(
                "weight {} of '{}' moves it outside levels -{}..={}",
                input.weight, input.title, MAX_LEVEL, MAX_LEVEL
            ))
        })?;

        if let Some(parent_id) = parent {
            let parent_node = &mut arena[parent_id];
            parent_node.children.push(id);
            let natural = parent_node.level + 1;
            if level > natural {
                let skipped = (level - natural) as u32;
                trace!(parent = parent_id, child = id, skipped, "Connector skips levels");
                parent_node.line_skips_levels = Some(skipped);
            }
        }

        arena.push(ConnectedNode {
            id,
            title: input.title.clone(),
            subtitle: input.subtitle.clone(),
            weight: input.weight,
            large: input.large,
            parent,
            children: Vec::with_capacity(input.children.len()),
            level,
            original_index,
            line_skips_levels: None,
        });

        // Reverse push keeps pre-order: the first child is popped first
        for (index, child) in input.children.iter().enumerate().rev() {
            stack.push((child, Some(id), index));
        }
    }

    let mut levels = LevelMap::from_arena(arena, 0);
    demote_root_overflow(&mut levels);

    info!(
        node_count = levels.node_count(),
        level_count = levels.level_count(),
        "Leveling completed"
    );
    Ok(levels)
}

/// Move every root-level node past the first three one level down
fn demote_root_overflow(levels: &mut LevelMap) {
    let root_level = levels.root_level();
    let overflow: Vec<NodeId> = match levels.level(root_level) {
        Some(level) if level.nodes.len() > MAX_ROOT_LEVEL_NODES => {
            level.nodes[MAX_ROOT_LEVEL_NODES..].to_vec()
        }
        _ => return,
    };

    debug!(
        demoted = overflow.len(),
        to_level = root_level + 1,
        "Demoting root level overflow"
    );
    for id in overflow {
        levels.move_node(id, root_level + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(levels: &LevelMap, index: i32) -> Vec<String> {
        levels
            .level(index)
            .map(|level| {
                level
                    .nodes
                    .iter()
                    .map(|&id| levels.node(id).title.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_single_root() {
        let levels = levelize(&OrgNode::new("CEO")).unwrap();
        assert_eq!(levels.level_count(), 1);
        assert_eq!(titles(&levels, 0), vec!["CEO"]);
        assert_eq!(levels.node(0).parent, None);
    }

    #[test]
    fn test_preorder_ids_and_indices() {
        let root = OrgNode::new("R")
            .with_child(OrgNode::new("A").with_child(OrgNode::new("A1")))
            .with_child(OrgNode::new("B"));
        let levels = levelize(&root).unwrap();

        let order: Vec<&str> = levels.nodes().map(|n| n.title.as_str()).collect();
        assert_eq!(order, vec!["R", "A", "A1", "B"]);
        assert_eq!(levels.node(3).original_index, 1);
        assert_eq!(levels.node(2).parent, Some(1));
        assert_eq!(levels.node(0).children, vec![1, 3]);
        assert_eq!(titles(&levels, 1), vec!["A", "B"]);
        assert_eq!(titles(&levels, 2), vec!["A1"]);
    }

    #[test]
    fn test_weight_shifts_level_and_records_skip() {
        let root = OrgNode::new("R")
            .with_child(OrgNode::new("A"))
            .with_child(OrgNode::new("B").with_weight(2));
        let levels = levelize(&root).unwrap();

        assert_eq!(levels.node(2).level, 3);
        assert_eq!(levels.node(0).line_skips_levels, Some(2));
        assert_eq!(levels.node(1).line_skips_levels, None);
    }

    #[test]
    fn test_last_skip_span_wins() {
        // Known limitation: only the last skipping child's span survives
        let root = OrgNode::new("R")
            .with_child(OrgNode::new("A").with_weight(3))
            .with_child(OrgNode::new("B").with_weight(1));
        let levels = levelize(&root).unwrap();
        assert_eq!(levels.node(0).line_skips_levels, Some(1));
    }

    #[test]
    fn test_root_overflow_demoted_in_order() {
        let root = OrgNode::new("R").with_children(
            ["A", "B", "C", "D"]
                .into_iter()
                .map(|t| OrgNode::new(t).with_weight(-1)),
        );
        let levels = levelize(&root).unwrap();

        assert_eq!(titles(&levels, 0), vec!["R", "A", "B"]);
        assert_eq!(titles(&levels, 1), vec!["C", "D"]);
        assert_eq!(levels.node(3).level, 1);
        assert_eq!(levels.node(4).level, 1);
    }

    #[test]
    fn test_three_root_level_nodes_kept() {
        let root = OrgNode::new("R")
            .with_child(OrgNode::new("A").with_weight(-1))
            .with_child(OrgNode::new("B").with_weight(-1));
        let levels = levelize(&root).unwrap();
        assert_eq!(titles(&levels, 0), vec!["R", "A", "B"]);
        assert!(levels.level(1).is_none());
    }

    #[test]
    fn test_extreme_weights_rejected() {
        for weight in [i32::MAX, i32::MIN, MAX_LEVEL, -MAX_LEVEL - 2] {
            let root = OrgNode::new("R").with_child(OrgNode::new("A").with_weight(weight));
            let err = levelize(&root).unwrap_err();
            assert!(matches!(err, ChartError::InvalidInput { .. }), "weight {}", weight);
        }

        let root = OrgNode::new("R").with_weight(i32::MIN);
        assert!(levelize(&root).is_err());
    }

    #[test]
    fn test_largest_weight_accepted() {
        let root = OrgNode::new("R").with_child(OrgNode::new("A").with_weight(MAX_LEVEL - 1));
        let levels = levelize(&root).unwrap();
        assert_eq!(levels.node(1).level, MAX_LEVEL);
        assert_eq!(levels.node(0).line_skips_levels, Some((MAX_LEVEL - 1) as u32));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut node = OrgNode::new("leaf");
        for depth in 0..1_000 {
            node = OrgNode::new(format!("n{}", depth)).with_child(node);
        }
        let levels = levelize(&node).unwrap();
        assert_eq!(levels.node_count(), 1_001);
        assert_eq!(levels.level_count(), 1_001);
    }
}
