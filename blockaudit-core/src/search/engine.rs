//! Page search: candidate pages are narrowed by the page store, then each
//! field value is matched locally to find the exact blocks.

use std::collections::VecDeque;
use std::vec;

use regex::Regex;
use tracing::{debug, info};

use crate::common::NameFilter;
use crate::error::AuditResult;
use crate::store::{FieldDef, FieldValue, Page, PageQuery, PageStore, PageType, Site};

use super::matcher::{find_all, search_blocks, SearchMatch};

/// Escapes double quotes so the pattern matches inside JSON-encoded text,
/// where `"` is stored as `\"`.
///
/// The result is only used for the store-side prefilter. Local matching
/// always uses the unescaped pattern.
pub fn prepare_pattern_for_json(pattern: &str) -> String {
    pattern.replace('"', r#"\\""#)
}

/// Live pages of exactly `page_type` in the default site whose stored
/// `field` text matches `pattern` case-insensitively.
///
/// Returns `Ok(None)` when the store cannot evaluate the predicate on this
/// field; the field is then skipped.
pub fn candidate_pages<'s, S>(
    store: &'s S,
    site: &Site,
    page_type: &PageType,
    field: &FieldDef,
    pattern: &Regex,
) -> AuditResult<Option<Vec<&'s Page>>>
where
    S: PageStore + ?Sized,
{
    let query = PageQuery::for_type(page_type)
        .live()
        .in_site(site)
        .field_iregex(&field.name, prepare_pattern_for_json(pattern.as_str()))
        .exact_type();

    match store.query(&query) {
        Ok(pages) => Ok(Some(pages)),
        Err(e) if e.is_recoverable() => {
            let page_type = page_type.dotted_name();
            info!(
                page_type = %page_type,
                field = %field.name,
                "Cannot search {}.{}.",
                page_type,
                field.name
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Matches `pattern` against one field of one page.
pub fn matches_for_page_field(
    page_type: &PageType,
    field: &FieldDef,
    page: &Page,
    page_url: Option<&str>,
    pattern: &Regex,
) -> Vec<SearchMatch> {
    let new_match = |schema_path, result_path, block_type, matches| SearchMatch {
        page_id: page.id,
        page_type: page_type.dotted_name(),
        page_title: page.title.clone(),
        page_url: page_url.map(str::to_string),
        field_name: field.name.clone(),
        field_type: field.kind.type_name().to_string(),
        schema_path,
        result_path,
        block_type,
        matches,
    };

    match page.field_value(field) {
        FieldValue::Rich(value) => search_blocks(pattern, &value)
            .map(|hit| {
                new_match(
                    hit.path.canonical_segments(),
                    hit.path.located_segments(),
                    Some(hit.block.type_name.clone()),
                    hit.matches,
                )
            })
            .collect(),
        FieldValue::Plain(text) => {
            let matches = find_all(pattern, &text);
            if matches.is_empty() {
                Vec::new()
            } else {
                vec![new_match(Vec::new(), Vec::new(), None, matches)]
            }
        }
    }
}

/// Fields of `page_type` that pass `field_filter`, in declaration order.
///
/// Unlike usage, search considers every field; relation fields are
/// rejected later by the store.
pub fn searchable_fields<'p>(page_type: &'p PageType, field_filter: &NameFilter) -> Vec<&'p FieldDef> {
    page_type
        .fields
        .iter()
        .filter(|f| field_filter.allows(&f.name))
        .collect()
}

/// Searches every selected field of one page type.
///
/// Lazy at page granularity: the store is queried once per field as the
/// iterator reaches it, and a page's matches are computed only when the
/// previous page's matches have been consumed.
pub fn search_page_type<'s, S>(
    store: &'s S,
    page_type: &'s PageType,
    pattern: &Regex,
    field_filter: &NameFilter,
) -> PageTypeSearch<'s, S>
where
    S: PageStore + ?Sized,
{
    PageTypeSearch {
        store,
        page_type,
        fields: searchable_fields(page_type, field_filter).into_iter(),
        pattern: pattern.clone(),
        site: None,
        cursor: None,
        buffer: VecDeque::new(),
        done: false,
    }
}

struct FieldCursor<'s> {
    field: &'s FieldDef,
    pages: vec::IntoIter<&'s Page>,
}

/// Iterator returned by [`search_page_type`]. Stops after the first error.
pub struct PageTypeSearch<'s, S: ?Sized> {
    store: &'s S,
    page_type: &'s PageType,
    fields: vec::IntoIter<&'s FieldDef>,
    pattern: Regex,
    site: Option<(&'s Site, &'s Page)>,
    cursor: Option<FieldCursor<'s>>,
    buffer: VecDeque<SearchMatch>,
    done: bool,
}

impl<'s, S> PageTypeSearch<'s, S>
where
    S: PageStore + ?Sized,
{
    fn default_site(&mut self) -> AuditResult<(&'s Site, &'s Page)> {
        if let Some(site) = self.site {
            return Ok(site);
        }
        let site = self.store.default_site()?;
        let root = self.store.site_root(site)?;
        self.site = Some((site, root));
        Ok((site, root))
    }

    /// Buffers the matches of the next candidate page. Returns `false`
    /// once every field is exhausted.
    fn advance(&mut self) -> AuditResult<bool> {
        loop {
            if let Some(cursor) = &mut self.cursor {
                if let Some(page) = cursor.pages.next() {
                    let url = self.site.and_then(|(site, root)| site.page_url(root, page));
                    self.buffer.extend(matches_for_page_field(
                        self.page_type,
                        cursor.field,
                        page,
                        url.as_deref(),
                        &self.pattern,
                    ));
                    return Ok(true);
                }
                self.cursor = None;
            }

            let Some(field) = self.fields.next() else {
                return Ok(false);
            };
            let (site, _) = self.default_site()?;
            if let Some(pages) =
                candidate_pages(self.store, site, self.page_type, field, &self.pattern)?
            {
                debug!(
                    page_type = %self.page_type.dotted_name(),
                    field = %field.name,
                    candidates = pages.len(),
                    "Searching field"
                );
                self.cursor = Some(FieldCursor {
                    field,
                    pages: pages.into_iter(),
                });
            }
        }
    }
}

impl<'s, S> Iterator for PageTypeSearch<'s, S>
where
    S: PageStore + ?Sized,
{
    type Item = AuditResult<SearchMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.buffer.pop_front() {
                return Some(Ok(found));
            }
            if self.done {
                return None;
            }
            match self.advance() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
