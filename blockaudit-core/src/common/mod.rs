//! Common utilities shared across the aggregator and the search engine.
//!
//! Both walk content trees and name what they find with the same dotted
//! paths, so the path type and the traversal live here.

mod block_path;
mod name_filter;
mod tree_walk;

pub use block_path::{block_name, BlockPath, Segment, UNNAMED_BLOCK};
pub use name_filter::NameFilter;
pub use tree_walk::{Child, Position, TreeNode, Visit, Walk};
