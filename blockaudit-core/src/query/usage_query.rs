//! Filterable, sliceable view over block usage.
//!
//! ```rust,ignore
//! let rows = BlockUsageQuery::new()
//!     .filter_page_type("testapp.SearchTestPage")
//!     .filter_field("streamfield_with_list")
//!     .slice(0..10)
//!     .run(&store)?;
//! ```

use std::collections::VecDeque;
use std::ops::Range;
use std::vec;

use crate::common::NameFilter;
use crate::error::AuditResult;
use crate::store::{PageRegistry, PageStore, PageType};
use crate::usage::{audit_page_type, AuditedPath};

use super::slice::{Slice, Sliced};

/// Builder for block usage reports.
///
/// Filters accumulate: each `filter_*` call widens the accepted set, and
/// no call at all means everything is accepted.
#[derive(Debug, Clone, Default)]
pub struct BlockUsageQuery {
    /// Accepted page types, dotted or bare model names
    page_types: NameFilter,

    /// Accepted field names
    fields: NameFilter,

    /// Window applied to the flattened result
    slice: Slice,
}

impl BlockUsageQuery {
    /// Create an unfiltered, unbounded query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept pages of this type (dotted or bare name).
    pub fn filter_page_type(mut self, name: impl Into<String>) -> Self {
        self.page_types.push(name);
        self
    }

    /// Accept this field name.
    pub fn filter_field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name);
        self
    }

    /// Skip the first `offset` rows.
    pub fn offset(mut self, offset: usize) -> Self {
        self.slice.offset = offset;
        self
    }

    /// Return at most `limit` rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.slice.limit = Some(limit);
        self
    }

    /// Window the result like `rows[range]`.
    pub fn slice(mut self, range: Range<usize>) -> Self {
        self.slice = Slice::from_range(range);
        self
    }

    /// Page types passing the page-type filter, in registry order.
    pub fn filtered_page_types<'r, R>(&self, registry: &'r R) -> Vec<&'r PageType>
    where
        R: PageRegistry + ?Sized,
    {
        registry
            .page_types()
            .iter()
            .filter(|pt| self.page_types.allows_by(|name| pt.matches_name(name)))
            .collect()
    }

    /// Lazy result stream. Page types are audited one at a time as the
    /// stream reaches them.
    pub fn iter<'s, S>(&self, store: &'s S) -> Sliced<BlockUsageIter<'s, S>>
    where
        S: PageStore + ?Sized,
    {
        let inner = BlockUsageIter {
            store,
            page_types: self.filtered_page_types(store).into_iter(),
            fields: self.fields.clone(),
            buffer: VecDeque::new(),
            done: false,
        };
        self.slice.apply(inner)
    }

    /// Collect all rows inside the window.
    pub fn run<S>(&self, store: &S) -> AuditResult<Vec<AuditedPath>>
    where
        S: PageStore + ?Sized,
    {
        self.iter(store).collect()
    }

    /// Number of rows inside the window.
    pub fn count<S>(&self, store: &S) -> AuditResult<usize>
    where
        S: PageStore + ?Sized,
    {
        self.iter(store).try_fold(0, |n, row| row.map(|_| n + 1))
    }
}

/// Unsliced usage stream behind [`BlockUsageQuery::iter`].
pub struct BlockUsageIter<'s, S: ?Sized> {
    store: &'s S,
    page_types: vec::IntoIter<&'s PageType>,
    fields: NameFilter,
    buffer: VecDeque<AuditedPath>,
    done: bool,
}

impl<'s, S> Iterator for BlockUsageIter<'s, S>
where
    S: PageStore + ?Sized,
{
    type Item = AuditResult<AuditedPath>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                return Some(Ok(row));
            }
            if self.done {
                return None;
            }
            let Some(page_type) = self.page_types.next() else {
                self.done = true;
                return None;
            };
            match audit_page_type(self.store, page_type, &self.fields) {
                Ok(audit) => self.buffer.extend(audit.into_rows()),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::BlockDef;
    use crate::error::AuditError;
    use crate::store::{ContentSnapshot, FieldDef, FieldKind, Page, PageId, Site};
    use serde_json::{json, Map};

    fn page_type(model: &str, field: &str) -> PageType {
        PageType {
            app_label: "testapp".to_string(),
            model: model.to_string(),
            base: None,
            fields: vec![FieldDef::new(
                field,
                FieldKind::StreamField {
                    blocks: vec![
                        BlockDef::leaf("heading", "CharBlock"),
                        BlockDef::leaf("paragraph", "RichTextBlock"),
                    ],
                },
            )],
        }
    }

    fn store(sites: Vec<Site>) -> ContentSnapshot {
        let mut fields = Map::new();
        fields.insert("body".to_string(), json!([{"type": "heading", "value": "Hi"}]));
        ContentSnapshot::new(
            sites,
            vec![page_type("ArticlePage", "body"), page_type("EventPage", "content")],
            vec![
                Page {
                    id: PageId(1),
                    title: "Root".to_string(),
                    slug: String::new(),
                    url_path: "/".to_string(),
                    page_type: "wagtailcore.Page".to_string(),
                    live: true,
                    path: "0001".to_string(),
                    fields: Map::new(),
                },
                Page {
                    id: PageId(2),
                    title: "Article".to_string(),
                    slug: String::new(),
                    url_path: "/article/".to_string(),
                    page_type: "testapp.ArticlePage".to_string(),
                    live: true,
                    path: "00010001".to_string(),
                    fields,
                },
            ],
        )
    }

    fn default_site() -> Site {
        Site {
            hostname: "localhost".to_string(),
            port: 80,
            site_name: String::new(),
            root_page: PageId(1),
            is_default_site: true,
        }
    }

    #[test]
    fn test_unfiltered_runs_every_page_type() {
        let store = store(vec![default_site()]);
        let rows = BlockUsageQuery::new().run(&store).unwrap();
        let keys: Vec<_> = rows
            .iter()
            .map(|r| format!("{}:{}", r.page_type, r.path))
            .collect();
        assert_eq!(
            keys,
            vec![
                "testapp.ArticlePage:heading",
                "testapp.ArticlePage:paragraph",
                "testapp.EventPage:heading",
                "testapp.EventPage:paragraph",
            ]
        );
        assert_eq!(rows[0].total_occurrences, 1);
    }

    #[test]
    fn test_page_type_filter_accepts_bare_and_dotted() {
        let store = store(vec![default_site()]);
        let bare = BlockUsageQuery::new().filter_page_type("EventPage");
        let dotted = BlockUsageQuery::new().filter_page_type("testapp.EventPage");
        assert_eq!(bare.count(&store).unwrap(), 2);
        assert_eq!(dotted.count(&store).unwrap(), 2);

        let unknown = BlockUsageQuery::new().filter_page_type("nope.Missing");
        assert!(unknown.run(&store).unwrap().is_empty());
    }

    #[test]
    fn test_field_filter_applies_across_page_types() {
        let store = store(vec![default_site()]);
        let query = BlockUsageQuery::new().filter_field("content");
        let rows = query.run(&store).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.page_type == "testapp.EventPage"));
    }

    #[test]
    fn test_slice_and_limit() {
        let store = store(vec![default_site()]);
        let rows = BlockUsageQuery::new().slice(1..2).run(&store).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path, "paragraph");

        assert_eq!(BlockUsageQuery::new().limit(0).count(&store).unwrap(), 0);
        assert_eq!(BlockUsageQuery::new().offset(3).count(&store).unwrap(), 1);
    }

    #[test]
    fn test_limit_short_circuits_later_page_types() {
        // Every audit fails without a default site
        let store = store(vec![]);
        assert_eq!(BlockUsageQuery::new().limit(0).count(&store).unwrap(), 0);
        assert!(matches!(
            BlockUsageQuery::new().run(&store),
            Err(AuditError::Configuration { .. })
        ));
    }
}
