//! Tests for orientation resolution and skip-line margins

use tierchart::chart::{levelize, resolve_orientations, LevelMap, OrgNode};
use tierchart::{ChartConfig, Orientation};

fn resolve(root: &OrgNode, config: &ChartConfig) -> LevelMap {
    let mut levels = levelize(root).unwrap();
    resolve_orientations(&mut levels, config);
    levels
}

fn wide_team(count: usize) -> OrgNode {
    OrgNode::new("R").with_children((0..count).map(|i| {
        OrgNode::new(format!("C{}", i)).with_child(OrgNode::new(format!("C{}-report", i)))
    }))
}

#[test]
fn test_every_level_resolved() {
    let levels = resolve(&wide_team(3), &ChartConfig::default());
    assert!(levels.levels().all(|level| level.orientation.is_some()));
    assert!(levels.levels().all(|level| level.is_horizontal()));
}

#[test]
fn test_crowded_level_goes_vertical() {
    // 9 * 14 > 120
    let levels = resolve(&wide_team(9), &ChartConfig::default());
    assert_eq!(levels.orientation(0), Some(Orientation::Horizontal));
    assert_eq!(levels.orientation(1), Some(Orientation::Vertical));
    // 9 reports would fit on their own, but sit below a vertical level
    assert_eq!(levels.orientation(2), Some(Orientation::Vertical));
}

#[test]
fn test_exact_fit_stays_horizontal() {
    let config = ChartConfig::default().with_available_space(42.0);
    let levels = resolve(&wide_team(3), &config);
    assert_eq!(levels.orientation(1), Some(Orientation::Horizontal));

    let config = ChartConfig::default().with_available_space(41.9);
    let levels = resolve(&wide_team(3), &config);
    assert_eq!(levels.orientation(1), Some(Orientation::Vertical));
}

#[test]
fn test_non_positive_column_width_forces_vertical() {
    let config = ChartConfig {
        max_col_width: 0.0,
        ..ChartConfig::default()
    };
    let levels = resolve(&wide_team(2), &config);
    assert!(levels.levels().all(|level| level.is_vertical()));
}

#[test]
fn test_weighted_node_pulled_under_parent_in_stack() {
    let mut root = wide_team(9);
    root.children[0]
        .children
        .push(OrgNode::new("late").with_weight(2));
    let levels = resolve(&root, &ChartConfig::default());

    let late = levels.nodes().find(|node| node.title == "late").unwrap();
    assert_eq!(late.level, 2);
    assert!(levels.level(4).is_none());
    assert_eq!(levels.node(1).line_skips_levels, None);
}

#[test]
fn test_skipping_parents_take_the_edges() {
    let root = OrgNode::new("R").with_children(vec![
        OrgNode::new("A").with_child(OrgNode::new("a")),
        OrgNode::new("B").with_child(OrgNode::new("b").with_weight(1)),
        OrgNode::new("C"),
        OrgNode::new("D").with_child(OrgNode::new("d").with_weight(1)),
    ]);
    let levels = resolve(&root, &ChartConfig::default());

    let row: Vec<&str> = levels
        .level(1)
        .unwrap()
        .nodes
        .iter()
        .map(|&id| levels.node(id).title.as_str())
        .collect();
    assert_eq!(row, vec!["B", "A", "C", "D"]);

    for index in [1, 2] {
        let level = levels.level(index).unwrap();
        assert!(level.left_skip_line, "level {} left", index);
        assert!(level.right_skip_line, "level {} right", index);
    }
    let below = levels.level(3).unwrap();
    assert!(!below.has_skip_line());
}

#[test]
fn test_root_skip_reserves_left_margin() {
    let root = OrgNode::new("R").with_children(vec![
        OrgNode::new("A"),
        OrgNode::new("B").with_weight(1),
    ]);
    let levels = resolve(&root, &ChartConfig::default());

    assert!(levels.level(0).unwrap().left_skip_line);
    assert!(levels.level(1).unwrap().left_skip_line);
    assert!(!levels.level(2).unwrap().has_skip_line());
}

#[test]
fn test_root_skip_without_room_reserves_nothing() {
    // 32 fills the whole width: no room beside the root
    let config = ChartConfig::default().with_available_space(32.0);
    let root = OrgNode::new("R").with_children(vec![
        OrgNode::new("A"),
        OrgNode::new("B").with_weight(1),
    ]);
    let levels = resolve(&root, &config);
    assert!(!levels.level(0).unwrap().has_skip_line());
}

#[test]
fn test_vertical_levels_drop_skip_routing() {
    let config = ChartConfig::default().with_available_space(20.0);
    let root = OrgNode::new("R").with_children(vec![
        OrgNode::new("A").with_child(OrgNode::new("a").with_weight(1)),
        OrgNode::new("B").with_child(OrgNode::new("b")),
    ]);
    let levels = resolve(&root, &config);

    assert!(levels.is_vertical(1));
    assert_eq!(levels.node(1).line_skips_levels, None);
    assert!(levels.levels().all(|level| !level.has_skip_line()));
}
