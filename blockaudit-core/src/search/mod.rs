//! Pattern search across page content, down to individual blocks.

mod engine;
mod matcher;

pub use engine::{
    candidate_pages, matches_for_page_field, prepare_pattern_for_json, search_page_type,
    searchable_fields, PageTypeSearch,
};
pub use matcher::{find_all, search_blocks, BlockMatch, SearchMatch};
