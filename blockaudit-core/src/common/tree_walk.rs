//! Shared content-tree traversal.
//!
//! Schema definitions and bound content values are walked by the same
//! iterator, so both produce identical path strings for the same structural
//! location. Each tree type only describes its own shape through
//! [`TreeNode`]; the naming rule lives in [`BlockPath::join_name`].

use super::block_path::BlockPath;

/// Where a child sits inside its parent.
///
/// Positions never change the canonical path; they only add index segments
/// to the located path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Named or singular child (struct member, list element type).
    Inline,
    /// Element of a list or stream.
    Index(usize),
    /// Table cell.
    Cell { row: usize, column: usize },
}

impl Position {
    fn extend(self, path: &BlockPath) -> BlockPath {
        match self {
            Self::Inline => path.clone(),
            Self::Index(index) => path.join_index(index),
            Self::Cell { row, column } => path.join_index(row).join_index(column),
        }
    }
}

/// A child node together with its position in the parent.
#[derive(Debug)]
pub struct Child<'a, N> {
    pub node: &'a N,
    pub position: Position,
}

impl<'a, N> Child<'a, N> {
    pub fn inline(node: &'a N) -> Self {
        Self {
            node,
            position: Position::Inline,
        }
    }

    pub fn at(node: &'a N, position: Position) -> Self {
        Self { node, position }
    }
}

/// Node adapter for tree traversal.
///
/// # Example
/// ```ignore
/// impl TreeNode for BlockDef {
///     fn label(&self) -> Option<&str> {
///         Some(&self.name)
///     }
///
///     fn children(&self) -> Vec<Child<'_, Self>> {
///         self.child_blocks().iter().map(Child::inline).collect()
///     }
/// }
///
/// let paths: Vec<String> = block.walk().map(|v| v.path.canonical()).collect();
/// ```
pub trait TreeNode: Sized {
    /// The node's block name, or `None` when the node is a transparent
    /// container that neither yields nor extends the path.
    fn label(&self) -> Option<&str>;

    /// Children in declaration / positional order.
    fn children(&self) -> Vec<Child<'_, Self>>;

    /// Depth-first, pre-order walk starting at this node.
    fn walk(&self) -> Walk<'_, Self> {
        Walk::new(self, BlockPath::root())
    }
}

/// One labelled node reached by a [`Walk`].
#[derive(Debug)]
pub struct Visit<'a, N> {
    pub path: BlockPath,
    pub node: &'a N,
}

/// Lazy pre-order traversal over a [`TreeNode`] tree.
///
/// Uses an explicit stack, so deep nesting never grows the call stack.
pub struct Walk<'a, N> {
    stack: Vec<(&'a N, BlockPath)>,
}

impl<'a, N: TreeNode> Walk<'a, N> {
    /// Walk one subtree whose parent sits at `parent`.
    pub fn new(node: &'a N, parent: BlockPath) -> Self {
        Self {
            stack: vec![(node, parent)],
        }
    }

    /// Walk several sibling subtrees in order, each from the root path.
    pub fn many<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = &'a N>,
    {
        let mut stack: Vec<_> = nodes
            .into_iter()
            .map(|node| (node, BlockPath::root()))
            .collect();
        stack.reverse();
        Self { stack }
    }
}

impl<'a, N: TreeNode> Iterator for Walk<'a, N> {
    type Item = Visit<'a, N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, parent)) = self.stack.pop() {
            let (path, labelled) = match node.label() {
                Some(name) => (parent.join_name(name), true),
                None => (parent, false),
            };

            // Reverse push keeps declaration order on pop
            for child in node.children().into_iter().rev() {
                let child_path = child.position.extend(&path);
                self.stack.push((child.node, child_path));
            }

            if labelled {
                return Some(Visit { path, node });
            }
        }
        None
    }
}
