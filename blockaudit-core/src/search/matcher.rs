//! Pattern matching over bound content trees.

use regex::Regex;
use serde::Serialize;

use crate::common::{BlockPath, TreeNode};
use crate::content::{BlockDef, ContentValue};
use crate::store::PageId;

/// One block whose terminal value matched the pattern.
#[derive(Debug, Clone)]
pub struct BlockMatch<'s> {
    pub path: BlockPath,
    pub block: &'s BlockDef,
    pub matches: Vec<String>,
}

/// All non-overlapping match texts, left to right.
pub fn find_all(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Lazily yields every terminal block in `value` with at least one match.
/// Container blocks are descended into but never matched themselves.
pub fn search_blocks<'v, 's>(
    pattern: &'v Regex,
    value: &'v ContentValue<'s>,
) -> impl Iterator<Item = BlockMatch<'s>> + 'v {
    value.walk().filter_map(move |visit| {
        let ContentValue::Bound { block, value } = visit.node else {
            return None;
        };
        let text = value.leaf_text()?;
        let matches = find_all(pattern, &text);
        if matches.is_empty() {
            return None;
        }
        Some(BlockMatch {
            path: visit.path,
            block: *block,
            matches,
        })
    })
}

/// A match of the search pattern in one field of one page.
///
/// For rich-content fields there is one match per matching terminal block;
/// plain fields produce at most one match with empty paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub page_id: PageId,
    /// Dotted name of the page type.
    pub page_type: String,
    pub page_title: String,
    /// URL relative to the default site.
    pub page_url: Option<String>,
    pub field_name: String,
    pub field_type: String,
    /// Path segments without indices.
    pub schema_path: Vec<String>,
    /// Path segments with stream, list and table indices.
    pub result_path: Vec<String>,
    pub block_type: Option<String>,
    pub matches: Vec<String>,
}

impl SearchMatch {
    /// Dotted canonical path, e.g. `list.item`.
    pub fn schema_path_str(&self) -> String {
        self.schema_path.join(".")
    }

    /// Dotted located path, e.g. `1.list.0.item`.
    pub fn result_path_str(&self) -> String {
        self.result_path.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::bind_stream;
    use serde_json::json;

    fn blocks() -> Vec<BlockDef> {
        vec![
            BlockDef::leaf("block", "CharBlock"),
            BlockDef::list("list", "ListBlock", BlockDef::leaf("", "CharBlock")),
            BlockDef::structure(
                "struct",
                "PersonBlock",
                vec![
                    BlockDef::leaf("givenname", "CharBlock"),
                    BlockDef::leaf("surname", "CharBlock"),
                ],
            ),
        ]
    }

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_find_all_returns_every_match() {
        assert_eq!(find_all(&regex("Test"), "Test or Test"), vec!["Test", "Test"]);
        assert!(find_all(&regex("Test"), "nothing").is_empty());
    }

    #[test]
    fn test_search_struct_only_matches_terminals() {
        let blocks = blocks();
        let value = bind_stream(
            &blocks,
            &json!([{"type": "struct", "value": {"givenname": "Test", "surname": "X"}}]),
        );
        let hits: Vec<_> = search_blocks(&regex("Test"), &value).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path.canonical(), "struct.givenname");
        assert_eq!(hits[0].path.to_string(), "0.struct.givenname");
        assert_eq!(hits[0].matches, vec!["Test"]);
    }

    #[test]
    fn test_search_list_reports_element_index() {
        let blocks = blocks();
        let value = bind_stream(
            &blocks,
            &json!([
                {"type": "block", "value": "none"},
                {"type": "list", "value": ["skip", "Test two"]}
            ]),
        );
        let hits: Vec<_> = search_blocks(&regex("Test"), &value).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path.located_segments(), vec!["1", "list", "1", "item"]);
        assert_eq!(hits[0].path.canonical_segments(), vec!["list", "item"]);
        assert_eq!(hits[0].block.type_name, "CharBlock");
    }

    #[test]
    fn test_search_empty_value() {
        let blocks = blocks();
        let value = bind_stream(&blocks, &json!([]));
        assert_eq!(search_blocks(&regex("."), &value).count(), 0);
    }
}
