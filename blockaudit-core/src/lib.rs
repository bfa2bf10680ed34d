//! blockaudit-core: block usage auditing and nested content search for CMS
//! page trees.
//!
//! Pages store rich content as streams of typed, nestable blocks. This
//! library answers two questions about such content:
//!
//! - **Block usage**: for every path a stream field's schema declares, how
//!   many times it occurs, on how many pages, how many of them live, and how
//!   many inside the default site.
//! - **Page search**: which pages, fields and individual blocks match a
//!   regular expression, with the exact location of every match.
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use blockaudit_core::prelude::*;
//!
//! let store = ContentSnapshot::load(Path::new("content.json"))?;
//!
//! for row in BlockUsageQuery::new().filter_page_type("BlogPage").run(&store)? {
//!     println!("{} {} {}", row.field, row.path, row.total_occurrences);
//! }
//!
//! let matches = PageSearchQuery::new().filter_search("Test").limit(10).run(&store)?;
//! ```
//!
//! # Module Organization
//!
//! - [`common`]: Block paths and the tree walk shared by schema and values
//! - [`content`]: Block definitions, bound values, raw JSON binding
//! - [`store`]: Page registry and page store contracts, JSON snapshot store
//! - [`usage`]: Block usage aggregation per page type
//! - [`search`]: Store prefiltering and block-level matching
//! - [`query`]: Filterable, sliceable, lazy views over both
//! - [`selector`]: `app_label.Model.field` selectors
//! - [`report`]: CSV, plaintext and JSON output
//! - [`error`]: Typed error handling

pub mod common;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod query;
pub mod report;
pub mod search;
pub mod selector;
pub mod store;
pub mod usage;

// Common trait re-exports
pub use common::TreeNode;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{AuditError, AuditResult, IoResultExt};

// Paths and traversal
pub use common::{block_name, BlockPath, NameFilter, Segment, Visit, Walk, UNNAMED_BLOCK};

// Configuration
pub use config::{load_config, AuditConfig, OutputConfig, OutputFormat};

// Content model
pub use content::{bind_block, bind_stream, BlockDef, BlockKind, ContentValue};

// Logging
pub use logging::{init_structured_logging, log_info, log_warn};

// Page store
pub use store::{
    ContentSnapshot, FieldDef, FieldKind, FieldValue, Page, PageId, PageQuery, PageRegistry,
    PageStore, PageType, Site,
};

// Usage aggregation
pub use usage::{audit_page_type, schema_paths, AuditedPath, FieldAudit, PageTypeAudit};

// Search
pub use search::{
    candidate_pages, matches_for_page_field, prepare_pattern_for_json, search_blocks,
    search_page_type, searchable_fields, SearchMatch,
};

// Filter layer
pub use query::{BlockUsageQuery, PageSearchQuery, Slice};

// Selectors
pub use selector::{page_types_and_fields, parse_selectors, Selector};

// Reporting
pub use report::{
    print_json, print_search_plain, print_usage_plain, report_json, write_search_csv,
    write_usage_csv, SearchRow, UsageRow,
};
