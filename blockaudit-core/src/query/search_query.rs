//! Filterable, sliceable view over page search results.
//!
//! ```rust,ignore
//! let matches = PageSearchQuery::new()
//!     .filter_search("Test")
//!     .filter_page_type("SearchTestPage")
//!     .limit(20)
//!     .run(&store)?;
//! ```

use std::ops::Range;
use std::vec;

use regex::Regex;

use crate::common::NameFilter;
use crate::error::{AuditError, AuditResult};
use crate::search::{search_page_type, PageTypeSearch, SearchMatch};
use crate::store::{PageRegistry, PageStore, PageType};

use super::slice::{Slice, Sliced};

/// Builder for page search reports.
///
/// Without a search pattern the empty pattern is used, so every candidate
/// field yields one empty match.
#[derive(Debug, Clone, Default)]
pub struct PageSearchQuery {
    /// Accepted page types, dotted or bare model names
    page_types: NameFilter,

    /// Accepted field names
    fields: NameFilter,

    /// Search pattern; the first one given is kept
    search: Option<String>,

    /// Window applied to the flattened result
    slice: Slice,
}

impl PageSearchQuery {
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

    /// Set the search pattern. Later calls do not replace an earlier one.
    pub fn filter_search(mut self, pattern: impl Into<String>) -> Self {
        if self.search.is_none() {
            self.search = Some(pattern.into());
        }
        self
    }

    /// Skip the first `offset` matches.
    pub fn offset(mut self, offset: usize) -> Self {
        self.slice.offset = offset;
        self
    }

    /// Return at most `limit` matches.
    pub fn limit(mut self, limit: usize) -> Self {
        self.slice.limit = Some(limit);
        self
    }

    /// Window the result like `matches[range]`.
    pub fn slice(mut self, range: Range<usize>) -> Self {
        self.slice = Slice::from_range(range);
        self
    }

    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    /// Compiles the search pattern for local matching.
    pub fn search_regex(&self) -> AuditResult<Regex> {
        let pattern = self.search();
        Regex::new(pattern).map_err(|e| AuditError::pattern(pattern, &e))
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

    /// Lazy result stream. Fails up front only if the pattern does not
    /// compile; store errors surface as items.
    pub fn iter<'s, S>(&self, store: &'s S) -> AuditResult<Sliced<PageSearchIter<'s, S>>>
    where
        S: PageStore + ?Sized,
    {
        let inner = PageSearchIter {
            store,
            page_types: self.filtered_page_types(store).into_iter(),
            pattern: self.search_regex()?,
            fields: self.fields.clone(),
            current: None,
            failed: false,
        };
        Ok(self.slice.apply(inner))
    }

    /// Collect all matches inside the window.
    pub fn run<S>(&self, store: &S) -> AuditResult<Vec<SearchMatch>>
    where
        S: PageStore + ?Sized,
    {
        self.iter(store)?.collect()
    }

    /// Number of matches inside the window.
    pub fn count<S>(&self, store: &S) -> AuditResult<usize>
    where
        S: PageStore + ?Sized,
    {
        self.iter(store)?.try_fold(0, |n, found| found.map(|_| n + 1))
    }
}

/// Unsliced search stream behind [`PageSearchQuery::iter`].
pub struct PageSearchIter<'s, S: ?Sized> {
    store: &'s S,
    page_types: vec::IntoIter<&'s PageType>,
    pattern: Regex,
    fields: NameFilter,
    current: Option<PageTypeSearch<'s, S>>,
    failed: bool,
}

impl<'s, S> Iterator for PageSearchIter<'s, S>
where
    S: PageStore + ?Sized,
{
    type Item = AuditResult<SearchMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(search) = &mut self.current {
                match search.next() {
                    Some(Ok(found)) => return Some(Ok(found)),
                    Some(Err(e)) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }
            let page_type = self.page_types.next()?;
            self.current = Some(search_page_type(
                self.store,
                page_type,
                &self.pattern,
                &self.fields,
            ));
        }
    }
}
