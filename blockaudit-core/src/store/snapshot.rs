//! In-memory page store backed by a JSON content export.
//!
//! ```json
//! {
//!   "sites": [{"hostname": "localhost", "root_page": 2, "is_default_site": true}],
//!   "page_types": [{"app_label": "testapp", "model": "SearchTestPage",
//!                   "base": "wagtailcore.Page", "fields": [...]}],
//!   "pages": [{"id": 3, "title": "...", "page_type": "testapp.SearchTestPage",
//!              "live": true, "path": "000100010001", "fields": {...}}]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AuditError, AuditResult, IoResultExt};

use super::model::{Page, PageId, PageType, Site};
use super::query::{PageQuery, PageRegistry, PageStore};

#[derive(Debug, Default, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    sites: Vec<Site>,
    #[serde(default)]
    page_types: Vec<PageType>,
    #[serde(default)]
    pages: Vec<Page>,
}

/// A content export loaded into memory.
///
/// Pages are kept in tree-path order, which is the store's natural query
/// order.
#[derive(Debug, Default)]
pub struct ContentSnapshot {
    sites: Vec<Site>,
    page_types: Vec<PageType>,
    pages: Vec<Page>,
    by_id: HashMap<PageId, usize>,
}

impl ContentSnapshot {
    pub fn new(sites: Vec<Site>, page_types: Vec<PageType>, mut pages: Vec<Page>) -> Self {
        pages.sort_by(|a, b| a.path.cmp(&b.path));
        let by_id = pages.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        Self {
            sites,
            page_types,
            pages,
            by_id,
        }
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: &Path) -> AuditResult<Self> {
        let content = fs::read_to_string(path).with_path(path)?;
        Self::from_json_str(&content, path)
    }

    /// Parses a snapshot; `origin` is only used for error context.
    pub fn from_json_str(content: &str, origin: &Path) -> AuditResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(content)
            .map_err(|e| AuditError::snapshot(origin, e.to_string()))?;
        debug!(
            sites = raw.sites.len(),
            page_types = raw.page_types.len(),
            pages = raw.pages.len(),
            "Loaded content snapshot"
        );
        Ok(Self::new(raw.sites, raw.page_types, raw.pages))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// True if `type_name` is `ancestor` or inherits from it.
    fn is_subtype_of(&self, type_name: &str, ancestor: &PageType) -> bool {
        let mut current = Some(type_name);
        // Bounded by the registry size so a cyclic `base` chain terminates
        for _ in 0..=self.page_types.len() {
            let Some(name) = current else {
                return false;
            };
            let Some(pt) = self.page_type(name) else {
                return false;
            };
            if pt.app_label == ancestor.app_label && pt.model == ancestor.model {
                return true;
            }
            current = pt.base.as_deref();
        }
        false
    }

    fn compile_predicate(&self, query: &PageQuery<'_>) -> AuditResult<Option<(String, Regex)>> {
        let Some(predicate) = &query.field_regex else {
            return Ok(None);
        };
        let field = query
            .page_type
            .field(&predicate.field)
            .filter(|f| !f.kind.is_relation())
            .ok_or_else(|| {
                AuditError::unsupported_regex(query.page_type.dotted_name(), &predicate.field)
            })?;
        let regex = RegexBuilder::new(&predicate.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| AuditError::pattern(&predicate.pattern, &e))?;
        Ok(Some((field.name.clone(), regex)))
    }
}

impl PageRegistry for ContentSnapshot {
    fn page_types(&self) -> &[PageType] {
        &self.page_types
    }
}

impl PageStore for ContentSnapshot {
    fn default_site(&self) -> AuditResult<&Site> {
        self.sites
            .iter()
            .find(|s| s.is_default_site)
            .ok_or_else(|| AuditError::configuration("No default site is configured"))
    }

    fn page(&self, id: PageId) -> Option<&Page> {
        self.by_id.get(&id).map(|&i| &self.pages[i])
    }

    fn query(&self, query: &PageQuery<'_>) -> AuditResult<Vec<&Page>> {
        let predicate = self.compile_predicate(query)?;
        let site_root = query
            .site_root
            .map(|id| {
                self.page(id).ok_or_else(|| {
                    AuditError::configuration(format!("Site root page {} does not exist", id))
                })
            })
            .transpose()?;
        let type_name = query.page_type.dotted_name();

        let pages = self
            .pages
            .iter()
            .filter(|p| {
                if query.exact_type {
                    p.page_type == type_name
                } else {
                    self.is_subtype_of(&p.page_type, query.page_type)
                }
            })
            .filter(|p| !query.live_only || p.live)
            .filter(|p| site_root.map_or(true, |root| p.id == root.id || p.is_descendant_of(root)))
            .filter(|p| match &predicate {
                Some((field_name, regex)) => query
                    .page_type
                    .field(field_name)
                    .is_some_and(|field| regex.is_match(&p.stored_text(field))),
                None => true,
            })
            .collect();
        Ok(pages)
    }
}
