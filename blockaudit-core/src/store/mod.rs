//! External collaborators of the audit: the page-type registry and the page
//! store, plus an in-memory store loaded from a JSON content export.

pub mod model;
pub mod query;
pub mod snapshot;

pub use model::{FieldDef, FieldKind, FieldValue, Page, PageId, PageType, Site};
pub use query::{FieldRegex, PageQuery, PageRegistry, PageStore};
pub use snapshot::ContentSnapshot;
