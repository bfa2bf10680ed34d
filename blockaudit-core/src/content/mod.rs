//! Rich-content model: block definitions, bound values, and binding of raw
//! stored JSON.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐   bind.rs    ┌─────────────────────┐
//! │     schema.rs       │ ───────────▶ │      value.rs       │
//! │  BlockDef tree      │  raw JSON    │  ContentValue<'s>   │
//! │  (what may exist)   │              │  (what does exist)  │
//! └──────────┬──────────┘              └──────────┬──────────┘
//!            │        both implement TreeNode      │
//!            └───────────────┬─────────────────────┘
//!                            ▼
//!                  common::Walk (one naming rule)
//! ```

pub mod bind;
pub mod schema;
pub mod value;

pub use bind::{bind_block, bind_stream};
pub use schema::{BlockDef, BlockKind};
pub use value::{scalar_text, ContentValue};
