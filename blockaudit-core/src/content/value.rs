//! Bound content values: the runtime counterpart of [`BlockDef`].

use serde_json::Value;

use super::schema::BlockDef;
use crate::common::{Child, Position, TreeNode};

/// A populated content tree, bound against the schema it borrows.
///
/// Only [`ContentValue::Bound`] carries a block name. The container
/// variants are transparent to path naming; their children are always
/// `Bound`.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue<'s> {
    /// A value together with the block definition that produced it.
    Bound {
        block: &'s BlockDef,
        value: Box<ContentValue<'s>>,
    },
    /// Struct value: one bound child per declared child block.
    Group(Vec<ContentValue<'s>>),
    /// List or stream value: ordered bound elements.
    List(Vec<ContentValue<'s>>),
    /// Typed table value: rows of bound cells.
    Table { rows: Vec<Vec<ContentValue<'s>>> },
    /// Terminal value.
    Scalar(Value),
}

impl<'s> ContentValue<'s> {
    pub fn bound(block: &'s BlockDef, value: ContentValue<'s>) -> Self {
        Self::Bound {
            block,
            value: Box::new(value),
        }
    }

    /// An empty stream value.
    pub fn empty() -> Self {
        Self::List(Vec::new())
    }

    /// Text of a terminal value; `None` for containers.
    pub fn leaf_text(&self) -> Option<String> {
        match self {
            Self::Scalar(value) => Some(scalar_text(value)),
            _ => None,
        }
    }

    /// True when the tree holds no bound blocks at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bound { .. } | Self::Scalar(_) => false,
            Self::Group(children) | Self::List(children) => children.is_empty(),
            Self::Table { rows } => rows.iter().all(Vec::is_empty),
        }
    }
}

/// Renders a stored scalar as the text a pattern is matched against.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

impl TreeNode for ContentValue<'_> {
    fn label(&self) -> Option<&str> {
        match self {
            Self::Bound { block, .. } => Some(block.name.as_str()),
            Self::Group(_) | Self::List(_) | Self::Table { .. } | Self::Scalar(_) => None,
        }
    }

    fn children(&self) -> Vec<Child<'_, Self>> {
        match self {
            Self::Bound { value, .. } => vec![Child::inline(&**value)],
            Self::Group(children) => children.iter().map(Child::inline).collect(),
            Self::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| Child::at(item, Position::Index(i)))
                .collect(),
            Self::Table { rows } => rows
                .iter()
                .enumerate()
                .flat_map(|(row, cells)| {
                    cells
                        .iter()
                        .enumerate()
                        .map(move |(column, cell)| Child::at(cell, Position::Cell { row, column }))
                })
                .collect(),
            Self::Scalar(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("Test")), "Test");
        assert_eq!(scalar_text(&json!(null)), "");
        assert_eq!(scalar_text(&json!(1.5)), "1.5");
        assert_eq!(scalar_text(&json!(true)), "true");
        assert_eq!(scalar_text(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_bound_leaf_walk() {
        let block = BlockDef::leaf("block", "wagtail.blocks.CharBlock");
        let stream = ContentValue::List(vec![ContentValue::bound(
            &block,
            ContentValue::Scalar(json!("Test")),
        )]);
        let visits: Vec<_> = stream.walk().collect();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].path.canonical(), "block");
        assert_eq!(visits[0].path.to_string(), "0.block");
        assert!(matches!(visits[0].node, ContentValue::Bound { block: b, .. } if b.name == "block"));
    }

    #[test]
    fn test_is_empty() {
        assert!(ContentValue::empty().is_empty());
        assert!(ContentValue::Table { rows: vec![vec![]] }.is_empty());
        assert!(!ContentValue::Scalar(json!("x")).is_empty());
    }
}
