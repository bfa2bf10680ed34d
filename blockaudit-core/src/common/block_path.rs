//! Dotted block paths.
//!
//! A path is a sequence of name and index segments. The canonical form drops
//! the indices and identifies a structural location in a schema; the located
//! form keeps them and pinpoints one occurrence inside one page's value.

use std::fmt;

/// Name given to blocks declared without a name (list children, mostly).
pub const UNNAMED_BLOCK: &str = "item";

/// Returns the path segment name for a block name.
#[inline]
pub fn block_name(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED_BLOCK
    } else {
        name
    }
}

/// One step in a block path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Name(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A path from the top of a field's content to one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BlockPath {
    segments: Vec<Segment>,
}

impl BlockPath {
    /// The empty path above every top-level block.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extends the path with a block's name, naming unnamed blocks `item`.
    pub fn join_name(&self, name: &str) -> Self {
        self.join(Segment::Name(block_name(name).to_string()))
    }

    /// Extends the path with a list index or table coordinate.
    pub fn join_index(&self, index: usize) -> Self {
        self.join(Segment::Index(index))
    }

    fn join(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    /// Name segments only, as used for grouping by schema position.
    pub fn canonical_segments(&self) -> Vec<String> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Name(name) => Some(name.clone()),
                Segment::Index(_) => None,
            })
            .collect()
    }

    /// Every segment rendered as text.
    pub fn located_segments(&self) -> Vec<String> {
        self.segments.iter().map(ToString::to_string).collect()
    }

    /// Dotted path with indices stripped, e.g. `list.item`.
    pub fn canonical(&self) -> String {
        self.canonical_segments().join(".")
    }
}

/// Dotted path with indices kept, e.g. `0.list.1.item`.
impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
