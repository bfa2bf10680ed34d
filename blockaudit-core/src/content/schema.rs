//! Block definitions: the schema of a rich-content field.

use serde::{Deserialize, Serialize};

use crate::common::{Child, TreeNode};

/// One block type declared in a field's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    /// Local name; empty for unnamed blocks such as list children.
    #[serde(default)]
    pub name: String,
    /// Dotted block class name, e.g. `wagtail.blocks.CharBlock`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(flatten)]
    pub kind: BlockKind,
}

/// Structural shape of a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockKind {
    /// Terminal block holding a scalar value.
    Leaf,
    /// Fixed set of named children, one value each.
    Struct { children: Vec<BlockDef> },
    /// Sequence of values, each typed by one of the named children.
    Stream { children: Vec<BlockDef> },
    /// Sequence of values of a single element type.
    List { child: Box<BlockDef> },
    /// Rows of cells; each column is typed by one of the column blocks.
    Table { columns: Vec<BlockDef> },
}

impl BlockKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leaf => "leaf",
            Self::Struct { .. } => "struct",
            Self::Stream { .. } => "stream",
            Self::List { .. } => "list",
            Self::Table { .. } => "table",
        }
    }
}

impl BlockDef {
    pub fn leaf(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: BlockKind::Leaf,
        }
    }

    pub fn structure(
        name: impl Into<String>,
        type_name: impl Into<String>,
        children: Vec<BlockDef>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: BlockKind::Struct { children },
        }
    }

    pub fn stream(
        name: impl Into<String>,
        type_name: impl Into<String>,
        children: Vec<BlockDef>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: BlockKind::Stream { children },
        }
    }

    pub fn list(name: impl Into<String>, type_name: impl Into<String>, child: BlockDef) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: BlockKind::List {
                child: Box::new(child),
            },
        }
    }

    pub fn table(
        name: impl Into<String>,
        type_name: impl Into<String>,
        columns: Vec<BlockDef>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            kind: BlockKind::Table { columns },
        }
    }

    /// Child definitions in declaration order.
    pub fn child_blocks(&self) -> &[BlockDef] {
        match &self.kind {
            BlockKind::Leaf => &[],
            BlockKind::Struct { children } | BlockKind::Stream { children } => children,
            BlockKind::List { child } => std::slice::from_ref(&**child),
            BlockKind::Table { columns } => columns,
        }
    }

    /// Looks up a named child of a struct, stream or table block.
    pub fn child_named(&self, name: &str) -> Option<&BlockDef> {
        self.child_blocks().iter().find(|b| b.name == name)
    }
}

impl TreeNode for BlockDef {
    fn label(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    fn children(&self) -> Vec<Child<'_, Self>> {
        self.child_blocks().iter().map(Child::inline).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_block(name: &str) -> BlockDef {
        BlockDef::leaf(name, "wagtail.blocks.CharBlock")
    }

    #[test]
    fn test_list_schema_paths() {
        let list = BlockDef::list("list", "wagtail.blocks.ListBlock", char_block(""));
        let paths: Vec<_> = list.walk().map(|v| v.path.canonical()).collect();
        assert_eq!(paths, vec!["list", "list.item"]);
    }

    #[test]
    fn test_table_schema_paths() {
        let table = BlockDef::table(
            "table",
            "wagtail.contrib.typed_table_block.blocks.TypedTableBlock",
            vec![
                char_block("text"),
                BlockDef::leaf("numeric", "wagtail.blocks.FloatBlock"),
            ],
        );
        let paths: Vec<_> = table.walk().map(|v| v.path.canonical()).collect();
        assert_eq!(paths, vec!["table", "table.text", "table.numeric"]);
    }

    #[test]
    fn test_nested_stream_in_struct() {
        let section = BlockDef::structure(
            "section",
            "wagtail.blocks.StructBlock",
            vec![
                char_block("heading"),
                BlockDef::stream(
                    "body",
                    "wagtail.blocks.StreamBlock",
                    vec![char_block("paragraph"), char_block("quote")],
                ),
            ],
        );
        let visits: Vec<_> = section
            .walk()
            .map(|v| (v.path.canonical(), v.node.kind.as_str()))
            .collect();
        assert_eq!(
            visits,
            vec![
                ("section".to_string(), "struct"),
                ("section.heading".to_string(), "leaf"),
                ("section.body".to_string(), "stream"),
                ("section.body.paragraph".to_string(), "leaf"),
                ("section.body.quote".to_string(), "leaf"),
            ]
        );
    }

    #[test]
    fn test_deserialize_block_def() {
        let json = r#"{
            "name": "list",
            "type": "wagtail.blocks.ListBlock",
            "kind": "list",
            "child": {"type": "wagtail.blocks.CharBlock", "kind": "leaf"}
        }"#;
        let block: BlockDef = serde_json::from_str(json).unwrap();
        assert_eq!(block.name, "list");
        assert_eq!(block.child_blocks().len(), 1);
        assert_eq!(block.child_blocks()[0].name, "");
    }

    #[test]
    fn test_child_named() {
        let table = BlockDef::table("table", "TypedTableBlock", vec![char_block("text")]);
        assert!(table.child_named("text").is_some());
        assert!(table.child_named("numeric").is_none());
    }
}
