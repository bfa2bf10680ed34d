//! Binding raw stored field JSON against block definitions.
//!
//! Stored stream data follows the CMS's JSON layout:
//!
//! ```text
//! stream  [{"type": "<child>", "value": ..., "id": "..."}, ...]
//! struct  {"<child>": ..., ...}
//! list    [{"type": "item", "value": ..., "id": "..."}, ...]  or  [value, ...]
//! table   {"columns": [{"type": "<column>", "heading": ...}],
//!          "rows": [{"values": [...]}, ...]  or  [[...], ...]}
//! ```
//!
//! Binding is lenient: entries that reference undeclared block types are
//! dropped, and shapes that do not match the schema bind as empty.

use serde_json::Value;
use tracing::warn;

use super::schema::{BlockDef, BlockKind};
use super::value::ContentValue;

/// Binds the raw value of a stream field against its top-level blocks.
pub fn bind_stream<'s>(blocks: &'s [BlockDef], raw: &Value) -> ContentValue<'s> {
    let Some(entries) = raw.as_array() else {
        return ContentValue::empty();
    };

    let items = entries
        .iter()
        .filter_map(|entry| {
            let type_name = entry.get("type").and_then(Value::as_str)?;
            match blocks.iter().find(|b| b.name == type_name) {
                Some(block) => Some(bind_block(block, entry.get("value").unwrap_or(&Value::Null))),
                None => {
                    warn!(block_type = %type_name, "Dropping stream entry of undeclared block type");
                    None
                }
            }
        })
        .collect();

    ContentValue::List(items)
}

/// Binds one raw value against one block definition.
pub fn bind_block<'s>(block: &'s BlockDef, raw: &Value) -> ContentValue<'s> {
    let value = match &block.kind {
        BlockKind::Leaf => ContentValue::Scalar(raw.clone()),
        BlockKind::Struct { children } => bind_struct(children, raw),
        BlockKind::Stream { children } => bind_stream(children, raw),
        BlockKind::List { child } => bind_list(child, raw),
        BlockKind::Table { columns } => bind_table(columns, raw),
    };
    ContentValue::bound(block, value)
}

fn bind_struct<'s>(children: &'s [BlockDef], raw: &Value) -> ContentValue<'s> {
    let members = children
        .iter()
        .map(|child| bind_block(child, raw.get(&child.name).unwrap_or(&Value::Null)))
        .collect();
    ContentValue::Group(members)
}

fn bind_list<'s>(child: &'s BlockDef, raw: &Value) -> ContentValue<'s> {
    let Some(entries) = raw.as_array() else {
        return ContentValue::empty();
    };

    let items = entries
        .iter()
        .map(|entry| bind_block(child, list_item_value(entry)))
        .collect();
    ContentValue::List(items)
}

/// Unwraps `{"type": "item", "value": ...}` list entries; bare values pass
/// through unchanged.
fn list_item_value(entry: &Value) -> &Value {
    match entry.as_object() {
        Some(obj) if obj.get("type").and_then(Value::as_str) == Some("item") => {
            obj.get("value").unwrap_or(&Value::Null)
        }
        _ => entry,
    }
}

fn bind_table<'s>(columns: &'s [BlockDef], raw: &Value) -> ContentValue<'s> {
    // Resolve each stored column to its block; None marks an undeclared type
    let column_blocks: Vec<Option<&'s BlockDef>> = raw
        .get("columns")
        .and_then(Value::as_array)
        .map(|cols| {
            cols.iter()
                .map(|col| {
                    let type_name = col.get("type").and_then(Value::as_str).unwrap_or_default();
                    let block = columns.iter().find(|b| b.name == type_name);
                    if block.is_none() {
                        warn!(column_type = %type_name, "Dropping table column of undeclared type");
                    }
                    block
                })
                .collect()
        })
        .unwrap_or_default();

    let rows = raw
        .get("rows")
        .and_then(Value::as_array)
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    let values = row
                        .get("values")
                        .unwrap_or(row)
                        .as_array()
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    column_blocks
                        .iter()
                        .zip(values)
                        .filter_map(|(block, cell)| block.map(|b| bind_block(b, cell)))
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    ContentValue::Table { rows }
}
