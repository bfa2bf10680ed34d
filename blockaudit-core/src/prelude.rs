//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use blockaudit_core::prelude::*;
//! ```
//!
//! Brings in what a typical report needs: the snapshot store and its
//! traits, the two query builders, and their result types.

// Errors
pub use crate::error::{AuditError, AuditResult};

// Page store
pub use crate::store::{ContentSnapshot, PageRegistry, PageStore, PageType};

// Queries and results
pub use crate::query::{BlockUsageQuery, PageSearchQuery};
pub use crate::search::SearchMatch;
pub use crate::usage::AuditedPath;

// Traversal
pub use crate::common::{BlockPath, TreeNode};

// Configuration
pub use crate::config::{load_config, AuditConfig, OutputFormat};
