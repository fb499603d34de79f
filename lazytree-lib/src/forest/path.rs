//! Locators for nodes inside a forest

use std::fmt;
use std::ops::Deref;

/// Identifier of a node inside one [`KeyedForest`](super::KeyedForest)
/// instance.
///
/// Ids are pre-order positions assigned when the forest is built. They are
/// only meaningful for the forest that produced them: every structural
/// update yields a new forest with freshly assigned ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The synthetic root always receives the first id.
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the pre-order position.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Sibling indices from the root down to a node.
///
/// The first element is the root's own position and is always `0`, so the
/// root is addressed by `[0]` and the empty path addresses nothing. Offset
/// paths must be recomputed from the forest they are applied to: inserting
/// or removing a sibling above the target silently shifts what a stale path
/// points at.
///
/// # Example
///
/// ```
/// use lazytree_lib::forest::OffsetPath;
///
/// let path = OffsetPath::root().child(2).child(0);
/// assert_eq!(path.as_slice(), &[0, 2, 0]);
/// assert_eq!(path.parent(), Some(OffsetPath::root().child(2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OffsetPath(Vec<usize>);

impl OffsetPath {
    /// Path of the root node.
    pub fn root() -> Self {
        Self(vec![0])
    }

    /// Creates a path from raw indices.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Returns the path of the child at `index`.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Returns the path of the parent, or `None` for the root and empty path.
    pub fn parent(&self) -> Option<Self> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Returns the raw indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Deref for OffsetPath {
    type Target = [usize];

    fn deref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for OffsetPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for OffsetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}

/// Keys from the root down to a node, root key included.
///
/// Unlike an [`OffsetPath`] a key path can be carried between forests of
/// different shape, e.g. from a source forest into a selection over it.
/// When keys repeat among siblings the first match wins.
pub type KeyPath = Vec<String>;

/// Nodes from the root down to a target node, both ends included.
pub type NodePath<T> = Vec<T>;
