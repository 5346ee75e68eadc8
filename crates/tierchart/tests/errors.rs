//! Tests for error reporting across the pipeline

use std::error::Error as _;

use tierchart::chart::{ChartLayoutEngine, ChartParser};
use tierchart::{layout, BoxRequest, BoxSize, ChartConfig, ChartError};

fn parse_error(input: &str) -> ChartError {
    ChartParser::new().parse(input).unwrap_err()
}

#[test]
fn test_null_root_rejected() {
    let err = parse_error("null");
    assert!(matches!(err, ChartError::InvalidInput { .. }));
}

#[test]
fn test_non_object_root_rejected() {
    let err = parse_error(r#"["CEO"]"#);
    assert_eq!(err.to_string(), "Invalid input: root must be an object");
}

#[test]
fn test_missing_title_names_its_path() {
    let err = parse_error(r#"{"title": "R", "children": [{"title": "A"}, {"subtitle": "x"}]}"#);
    assert_eq!(err.to_string(), "Invalid input: children[1].title is required");
}

#[test]
fn test_nested_field_type_names_its_path() {
    let err = parse_error(
        r#"{"title": "R", "children": [{"title": "A", "children": [{"title": "a", "large": "yes"}]}]}"#,
    );
    assert!(err
        .to_string()
        .contains("children[0].children[0].large must be a boolean"));
}

#[test]
fn test_fractional_weight_rejected() {
    let err = parse_error(r#"{"title": "R", "weight": 1.5}"#);
    assert!(err.to_string().contains("root.weight must be an integer"));
}

#[test]
fn test_malformed_json_is_json_error() {
    let err = parse_error(r#"{"title": "#);
    assert!(matches!(err, ChartError::Json { .. }));
}

#[test]
fn test_facade_error_downcasts() {
    let err = layout(r#"{"title": 7}"#).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChartError>(),
        Some(ChartError::InvalidInput { .. })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let err = ChartConfig::from_json(r#"{"availableSpace": -5}"#).unwrap_err();
    assert!(err.to_string().contains("availableSpace must not be negative"));

    let err = ChartConfig::from_json(r#"{"horizontalSpacing": "wide"}"#).unwrap_err();
    assert!(matches!(err, ChartError::Json { .. }));

    let config = ChartConfig {
        large_org_size_multiplier: 0.0,
        ..ChartConfig::default()
    };
    assert!(ChartLayoutEngine::with_cells(config).is_err());
}

#[test]
fn test_measurement_failure_aborts_run() {
    let service = |request: &BoxRequest<'_>| -> anyhow::Result<BoxSize> {
        if request.title == "B" {
            anyhow::bail!("surface detached");
        }
        Ok(BoxSize::new(request.width, 3.0))
    };
    let engine = ChartLayoutEngine::new(ChartConfig::default(), service).unwrap();
    let root = ChartParser::new()
        .parse(r#"{"title": "R", "children": [{"title": "A"}, {"title": "B"}]}"#)
        .unwrap();

    let err = engine.recompute(&root).unwrap_err();
    match &err {
        ChartError::MeasurementFailure { node, .. } => assert_eq!(*node, 2),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(err.source().unwrap().to_string(), "surface detached");
}

#[test]
fn test_negative_size_is_measurement_failure() {
    let service = |request: &BoxRequest<'_>| -> anyhow::Result<BoxSize> {
        Ok(BoxSize::new(request.width, -1.0))
    };
    let engine = ChartLayoutEngine::new(ChartConfig::default(), service).unwrap();
    let root = ChartParser::new().parse(r#"{"title": "R"}"#).unwrap();

    let err = engine.recompute(&root).unwrap_err();
    assert!(matches!(err, ChartError::MeasurementFailure { node: 0, .. }));
}

#[test]
fn test_extreme_weight_is_invalid_input() {
    for weight in [i32::MAX, i32::MIN] {
        let input = format!(
            r#"{{"title": "R", "children": [{{"title": "A", "weight": {}}}]}}"#,
            weight
        );
        let root = ChartParser::new().parse(&input).unwrap();
        let err = ChartLayoutEngine::with_cells(ChartConfig::default())
            .unwrap()
            .recompute(&root)
            .unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput { .. }), "weight {}", weight);
    }
}
