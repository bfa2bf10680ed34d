//! Filter layer over the aggregator and the search engine.
//!
//! Both queries share the same contract: accumulating page type and field
//! filters, an offset/limit window, and lazy evaluation so that a bounded
//! window stops the underlying work early.

mod search_query;
mod slice;
mod usage_query;

pub use search_query::{PageSearchIter, PageSearchQuery};
pub use slice::{Slice, Sliced};
pub use usage_query::{BlockUsageIter, BlockUsageQuery};
