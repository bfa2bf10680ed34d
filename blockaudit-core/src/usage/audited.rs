//! Usage records and the per-field path table.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::content::BlockDef;
use crate::store::{Page, PageId};

/// Usage statistics for one schema path of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditedPath {
    /// Dotted name of the page type.
    pub page_type: String,
    pub field: String,
    /// Canonical dotted path, e.g. `list.item`.
    pub path: String,
    /// Type name of the block definition at `path`.
    pub block_type: String,
    pub block_kind: &'static str,
    /// Value nodes found at this path, summed across pages.
    pub total_occurrences: usize,
    #[serde(skip)]
    pub pages: BTreeSet<PageId>,
    pub pages_count: usize,
    pub pages_live_count: usize,
    pub pages_in_default_site_count: usize,
}

impl AuditedPath {
    pub fn new(
        page_type: impl Into<String>,
        field: impl Into<String>,
        path: impl Into<String>,
        block: &BlockDef,
    ) -> Self {
        Self {
            page_type: page_type.into(),
            field: field.into(),
            path: path.into(),
            block_type: block.type_name.clone(),
            block_kind: block.kind.as_str(),
            total_occurrences: 0,
            pages: BTreeSet::new(),
            pages_count: 0,
            pages_live_count: 0,
            pages_in_default_site_count: 0,
        }
    }

    /// Records one occurrence. Page counters only move the first time a
    /// page is seen at this path.
    pub fn record(&mut self, page: &Page, in_default_site: bool) {
        self.total_occurrences += 1;
        if !self.pages.insert(page.id) {
            return;
        }
        self.pages_count += 1;
        if page.live {
            self.pages_live_count += 1;
        }
        if in_default_site {
            self.pages_in_default_site_count += 1;
        }
    }

    pub fn is_unused(&self) -> bool {
        self.total_occurrences == 0
    }
}

/// Paths of one field in schema discovery order.
#[derive(Debug, Clone, Default)]
pub struct FieldAudit {
    pub field: String,
    paths: Vec<AuditedPath>,
    index: HashMap<String, usize>,
}

impl FieldAudit {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    /// Adds a path record. The first record for a path wins.
    pub fn insert(&mut self, audited: AuditedPath) {
        if self.index.contains_key(&audited.path) {
            return;
        }
        self.index.insert(audited.path.clone(), self.paths.len());
        self.paths.push(audited);
    }

    pub fn get(&self, path: &str) -> Option<&AuditedPath> {
        self.index.get(path).map(|&i| &self.paths[i])
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut AuditedPath> {
        self.index.get(path).map(|&i| &mut self.paths[i])
    }

    pub fn paths(&self) -> &[AuditedPath] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Audit of every selected field of one page type.
#[derive(Debug, Clone, Default)]
pub struct PageTypeAudit {
    pub page_type: String,
    pub fields: Vec<FieldAudit>,
}

impl PageTypeAudit {
    pub fn field(&self, name: &str) -> Option<&FieldAudit> {
        self.fields.iter().find(|f| f.field == name)
    }

    pub fn len(&self) -> usize {
        self.fields.iter().map(FieldAudit::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens into rows: field order, then schema discovery order.
    pub fn into_rows(self) -> Vec<AuditedPath> {
        self.fields.into_iter().flat_map(|f| f.paths).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn page(id: u64, live: bool) -> Page {
        Page {
            id: PageId(id),
            title: String::new(),
            slug: String::new(),
            url_path: String::new(),
            page_type: "testapp.SearchTestPage".to_string(),
            live,
            path: format!("0001{:04}", id),
            fields: Map::new(),
        }
    }

    #[test]
    fn test_record_counts_pages_once() {
        let block = BlockDef::leaf("item", "CharBlock");
        let mut audited = AuditedPath::new("testapp.SearchTestPage", "list", "list.item", &block);
        assert!(audited.is_unused());

        let live = page(3, true);
        audited.record(&live, true);
        audited.record(&live, true);
        audited.record(&page(5, false), false);

        assert_eq!(audited.total_occurrences, 3);
        assert_eq!(audited.pages_count, 2);
        assert_eq!(audited.pages_live_count, 1);
        assert_eq!(audited.pages_in_default_site_count, 1);
        assert!(audited.pages_live_count <= audited.pages_count);
    }

    #[test]
    fn test_field_audit_keeps_discovery_order() {
        let block = BlockDef::leaf("a", "CharBlock");
        let mut field = FieldAudit::new("body");
        field.insert(AuditedPath::new("t.P", "body", "b", &block));
        field.insert(AuditedPath::new("t.P", "body", "a", &block));
        field.insert(AuditedPath::new("t.P", "body", "b", &block));

        let order: Vec<_> = field.paths().iter().map(|p| p.path.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert!(field.get("a").is_some());
        assert!(field.get("c").is_none());
    }
}
