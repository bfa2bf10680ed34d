//! Block usage aggregation.
//!
//! For each rich-content field, every path its schema declares is reported
//! together with how often, and on how many pages, it is populated.

mod aggregator;
mod audited;

pub use aggregator::{audit_page_type, schema_paths, selected_fields};
pub use audited::{AuditedPath, FieldAudit, PageTypeAudit};
