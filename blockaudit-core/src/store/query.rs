//! Collaborator contracts: the page-type registry and the page store.

use crate::error::{AuditError, AuditResult};

use super::model::{Page, PageId, PageType, Site};

/// Lists the page types known to the CMS.
pub trait PageRegistry {
    /// Page types in registration order.
    fn page_types(&self) -> &[PageType];

    /// Looks up a page type by dotted or bare model name.
    fn page_type(&self, name: &str) -> Option<&PageType> {
        self.page_types().iter().find(|pt| pt.matches_name(name))
    }
}

/// A case-insensitive regex predicate pushed down to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRegex {
    pub field: String,
    pub pattern: String,
}

/// Query over pages of one type, built up before execution.
///
/// ```rust,ignore
/// let query = PageQuery::for_type(page_type)
///     .live()
///     .in_site(site)
///     .field_iregex("body", "Test")
///     .exact_type();
/// let pages = store.query(&query)?;
/// ```
#[derive(Debug, Clone)]
pub struct PageQuery<'q> {
    pub page_type: &'q PageType,
    /// Exclude pages whose concrete type merely inherits from `page_type`.
    pub exact_type: bool,
    pub live_only: bool,
    /// Restrict to a site's root page and its descendants.
    pub site_root: Option<PageId>,
    pub field_regex: Option<FieldRegex>,
}

impl<'q> PageQuery<'q> {
    pub fn for_type(page_type: &'q PageType) -> Self {
        Self {
            page_type,
            exact_type: false,
            live_only: false,
            site_root: None,
            field_regex: None,
        }
    }

    pub fn exact_type(mut self) -> Self {
        self.exact_type = true;
        self
    }

    pub fn live(mut self) -> Self {
        self.live_only = true;
        self
    }

    pub fn in_site(mut self, site: &Site) -> Self {
        self.site_root = Some(site.root_page);
        self
    }

    pub fn field_iregex(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.field_regex = Some(FieldRegex {
            field: field.into(),
            pattern: pattern.into(),
        });
        self
    }
}

/// Read access to the persisted page tree.
///
/// Errors other than [`AuditError::UnsupportedPredicate`] and
/// [`AuditError::Configuration`] are passed through by the audit unchanged.
pub trait PageStore: PageRegistry {
    /// The designated default site.
    fn default_site(&self) -> AuditResult<&Site>;

    fn page(&self, id: PageId) -> Option<&Page>;

    /// Executes a query, returning pages in the store's natural order.
    fn query(&self, query: &PageQuery<'_>) -> AuditResult<Vec<&Page>>;

    /// All pages of exactly this type, live or not, anywhere in the tree.
    fn pages_exact(&self, page_type: &PageType) -> AuditResult<Vec<&Page>> {
        self.query(&PageQuery::for_type(page_type).exact_type())
    }

    /// Live pages of this type (or its subtypes) inside the default site.
    fn live_pages_in_default_site(&self, page_type: &PageType) -> AuditResult<Vec<&Page>> {
        let site = self.default_site()?;
        self.query(&PageQuery::for_type(page_type).live().in_site(site))
    }

    /// The root page of a site.
    fn site_root(&self, site: &Site) -> AuditResult<&Page> {
        self.page(site.root_page).ok_or_else(|| {
            AuditError::configuration(format!(
                "Root page {} of site {} does not exist",
                site.root_page, site.hostname
            ))
        })
    }
}
