//! Input tree and its JSON parser
//!
//! The input is a JSON object tree:
//!
//! ```json
//! {
//!   "title": "Ada Lovelace",
//!   "subtitle": "CEO",
//!   "children": [
//!     { "title": "Engineering", "large": true },
//!     { "title": "Finance", "weight": 1 }
//!   ]
//! }
//! ```
//!
//! Only `title`, `subtitle`, `weight`, `large` and `children` are
//! interpreted; other fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, span, trace, Level};

use crate::core::{ChartError, Result};

/// One entity of the organization tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgNode {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Shifts the node's level relative to its natural depth
    #[serde(default, skip_serializing_if = "is_zero")]
    pub weight: i32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub large: bool,
    /// Display order; also the tie-break order everywhere downstream
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OrgNode>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl OrgNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            weight: 0,
            large: false,
            children: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn large(mut self) -> Self {
        self.large = true;
        self
    }

    pub fn with_child(mut self, child: OrgNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = OrgNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of parent→child edges in this subtree
    pub fn edge_count(&self) -> usize {
        self.node_count() - 1
    }
}

/// Parses the JSON input format into an [`OrgNode`] tree
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartParser;

impl ChartParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a JSON document into a tree
    ///
    /// A `null` or non-object root, a missing or non-string `title`, and
    /// ill-typed optional fields are reported as [`ChartError::InvalidInput`]
    /// naming the offending path, e.g. `children[2].title`.
    pub fn parse(&self, input: &str) -> Result<OrgNode> {
        let parse_span = span!(Level::INFO, "parse_chart", input_len = input.len());
        let _enter = parse_span.enter();

        let document: Value = serde_json::from_str(input)?;
        let root = self.parse_value(&document)?;

        debug!(node_count = root.node_count(), "Parsed org chart");
        Ok(root)
    }

    /// Convert an already-decoded JSON value
    pub fn parse_value(&self, value: &Value) -> Result<OrgNode> {
        if value.is_null() {
            return Err(ChartError::invalid_input("root node is null"));
        }
        validate_shape(value, "root")?;
        trace!("Input shape validated");
        Ok(OrgNode::deserialize(value)?)
    }
}

/// Walk the document checking field types, so errors can name a path
fn validate_shape(root: &Value, root_path: &str) -> Result<()> {
    let mut stack = vec![(root, root_path.to_string())];

    while let Some((value, path)) = stack.pop() {
        let object = value
            .as_object()
            .ok_or_else(|| ChartError::invalid_input(format!("{} must be an object", path)))?;

        match object.get("title") {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(ChartError::invalid_input(format!(
                    "{}.title must be a string",
                    path
                )))
            }
            None => {
                return Err(ChartError::invalid_input(format!(
                    "{}.title is required",
                    path
                )))
            }
        }

        if let Some(subtitle) = object.get("subtitle") {
            if !(subtitle.is_string() || subtitle.is_null()) {
                return Err(ChartError::invalid_input(format!(
                    "{}.subtitle must be a string",
                    path
                )));
            }
        }

        if let Some(weight) = object.get("weight") {
            let fits = weight
                .as_i64()
                .is_some_and(|w| i32::try_from(w).is_ok());
            if !fits {
                return Err(ChartError::invalid_input(format!(
                    "{}.weight must be an integer",
                    path
                )));
            }
        }

        if let Some(large) = object.get("large") {
            if !large.is_boolean() {
                return Err(ChartError::invalid_input(format!(
                    "{}.large must be a boolean",
                    path
                )));
            }
        }

        match object.get("children") {
            None => {}
            Some(Value::Array(children)) => {
                for (index, child) in children.iter().enumerate().rev() {
                    let child_path = if path == "root" {
                        format!("children[{}]", index)
                    } else {
                        format!("{}.children[{}]", path, index)
                    };
                    stack.push((child, child_path));
                }
            }
            Some(_) => {
                return Err(ChartError::invalid_input(format!(
                    "{}.children must be an array",
                    path
                )))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let root = ChartParser::new().parse(r#"{"title": "CEO"}"#).unwrap();
        assert_eq!(root, OrgNode::new("CEO"));
    }

    #[test]
    fn test_parse_full_node() {
        let input = r#"{
            "title": "CEO",
            "subtitle": "Ada",
            "weight": 1,
            "large": true,
            "children": [{"title": "CTO"}, {"title": "CFO", "color": "red"}]
        }"#;
        let root = ChartParser::new().parse(input).unwrap();
        assert_eq!(root.subtitle.as_deref(), Some("Ada"));
        assert_eq!(root.weight, 1);
        assert!(root.large);
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[1].title, "CFO");
    }

    #[test]
    fn test_null_root_is_invalid() {
        let err = ChartParser::new().parse("null").unwrap_err();
        assert!(matches!(err, ChartError::InvalidInput { .. }));
    }

    #[test]
    fn test_missing_title_names_path() {
        let input = r#"{"title": "CEO", "children": [{"title": "A"}, {"subtitle": "x"}]}"#;
        let err = ChartParser::new().parse(input).unwrap_err();
        assert!(err.to_string().contains("children[1].title is required"));
    }

    #[test]
    fn test_nested_path() {
        let input = r#"{"title": "CEO", "children": [{"title": "A", "children": [{"title": 3}]}]}"#;
        let err = ChartParser::new().parse(input).unwrap_err();
        assert!(err
            .to_string()
            .contains("children[0].children[0].title must be a string"));
    }

    #[test]
    fn test_bad_weight() {
        let input = r#"{"title": "CEO", "weight": 1.5}"#;
        let err = ChartParser::new().parse(input).unwrap_err();
        assert!(err.to_string().contains("root.weight"));
    }

    #[test]
    fn test_malformed_json() {
        let err = ChartParser::new().parse("{").unwrap_err();
        assert!(matches!(err, ChartError::Json { .. }));
    }

    #[test]
    fn test_counts() {
        let root = OrgNode::new("CEO")
            .with_child(OrgNode::new("A").with_child(OrgNode::new("A1")))
            .with_child(OrgNode::new("B"));
        assert_eq!(root.node_count(), 4);
        assert_eq!(root.edge_count(), 3);
    }

    #[test]
    fn test_serialize_skips_defaults() {
        let json = serde_json::to_string(&OrgNode::new("CEO")).unwrap();
        assert_eq!(json, r#"{"title":"CEO"}"#);
    }
}
