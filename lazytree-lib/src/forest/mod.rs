//! Immutable keyed forests
//!
//! A [`KeyedForest`] wraps a single synthetic root and indexes every node
//! reachable from it by a caller supplied key. Keys need not be unique: the
//! same concept may appear under several parents. Forests are never mutated;
//! every structural change returns a new forest with a rebuilt index while
//! older forests stay valid as snapshots.

mod path;
mod traversable;

pub use path::*;
pub use traversable::*;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ForestError;

/// Key function shared between a forest and every forest derived from it.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// An immutable multi-rooted tree indexed by key.
///
/// The top-level nodes of the forest are the children of a synthetic root,
/// which is excluded from "real" results by callers via
/// [`is_root`](Self::is_root).
///
/// This type is cheap to clone (uses `Arc` internally).
///
/// # Example
///
/// ```
/// use lazytree_lib::forest::{KeyedForest, OffsetPath};
/// use lazytree_lib::model::Node;
///
/// let root = Node::root().with_children(vec![
///     Node::new("http://example.com/a").with_children(vec![Node::new("http://example.com/b")]),
/// ]);
/// let forest = KeyedForest::create(Node::key_of, root);
///
/// let b = forest.get_first("http://example.com/b").unwrap();
/// assert_eq!(forest.offset_path(b), OffsetPath::new(vec![0, 0, 0]));
/// assert_eq!(forest.from_offset_path(&forest.offset_path(b)), Some(b));
/// ```
pub struct KeyedForest<T> {
    inner: Arc<ForestInner<T>>,
}

struct ForestInner<T> {
    key_of: KeyFn<T>,
    /// Nodes in pre-order; `NodeId` indexes into this list.
    entries: Vec<Entry<T>>,
    /// Key to every node carrying it, in pre-order.
    nodes: HashMap<String, Vec<NodeId>>,
}

struct Entry<T> {
    node: T,
    key: String,
    parent: Option<NodeId>,
    /// Position among the parent's children.
    index: usize,
    children: Vec<NodeId>,
}

impl<T> Clone for KeyedForest<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for KeyedForest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedForest")
            .field("len", &self.inner.entries.len())
            .field("root", &self.inner.entries[0].node)
            .finish()
    }
}

impl<T: Traversable> KeyedForest<T> {
    /// Creates a forest from a key function and its root.
    pub fn create<F>(key_of: F, root: T) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::with_key_fn(Arc::new(key_of), root)
    }

    /// Creates a forest whose root is `T::default()` with an empty child list.
    pub fn empty<F>(key_of: F) -> Self
    where
        T: Default,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self::create(key_of, T::default().set_children(Some(Vec::new())))
    }

    /// Creates a forest from an already shared key function.
    pub fn with_key_fn(key_of: KeyFn<T>, root: T) -> Self {
        let mut entries: Vec<Entry<T>> = Vec::new();
        let mut nodes: HashMap<String, Vec<NodeId>> = HashMap::new();
        let mut stack: Vec<(T, Option<NodeId>, usize)> = vec![(root, None, 0)];

        while let Some((node, parent, index)) = stack.pop() {
            let id = NodeId(entries.len());
            let key = key_of(&node);
            if let Some(children) = node.children() {
                for (i, child) in children.iter().enumerate().rev() {
                    stack.push((child.clone(), Some(id), i));
                }
            }
            if let Some(parent) = parent {
                entries[parent.0].children.push(id);
            }
            nodes.entry(key.clone()).or_default().push(id);
            entries.push(Entry {
                node,
                key,
                parent,
                index,
                children: Vec::new(),
            });
        }

        Self {
            inner: Arc::new(ForestInner {
                key_of,
                entries,
                nodes,
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Returns the shared key function.
    pub fn key_fn(&self) -> KeyFn<T> {
        Arc::clone(&self.inner.key_of)
    }

    /// Computes the key of any node, including nodes of other forests.
    pub fn key_of(&self, node: &T) -> String {
        (self.inner.key_of)(node)
    }

    /// Returns the synthetic root.
    pub fn root(&self) -> &T {
        &self.inner.entries[0].node
    }

    /// Returns `true` if `id` is the synthetic root.
    pub fn is_root(&self, id: NodeId) -> bool {
        id == NodeId::ROOT
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this forest.
    pub fn node(&self, id: NodeId) -> &T {
        &self.inner.entries[id.0].node
    }

    /// Returns the node with the given id, or `None` if out of range.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.inner.entries.get(id.0).map(|e| &e.node)
    }

    /// Returns the key of the node with the given id.
    pub fn key(&self, id: NodeId) -> &str {
        &self.inner.entries[id.0].key
    }

    /// Returns the number of nodes, root included.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Returns `true` if the root has no descendants.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.len() == 1
    }

    /// Iterates over all nodes in pre-order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> {
        self.inner
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (NodeId(i), &e.node))
    }

    /// Returns an arbitrary node with the given key.
    pub fn get_first(&self, key: &str) -> Option<NodeId> {
        self.nodes_with_key(key).first().copied()
    }

    /// Returns every node carrying `key`, in pre-order.
    pub fn nodes_with_key(&self, key: &str) -> &[NodeId] {
        self.inner.nodes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if at least one node carries `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.nodes.contains_key(key)
    }

    /// Returns the parent id, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.inner.entries[id.0].parent
    }

    /// Returns the ids of the node's children in order.
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        &self.inner.entries[id.0].children
    }

    // -------------------------------------------------------------------------
    // Paths
    // -------------------------------------------------------------------------

    /// Returns the ids from the root down to `id`, both included.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut ids = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            ids.push(parent);
            current = parent;
        }
        ids.reverse();
        ids
    }

    /// Returns the sibling indices from the root down to `id`.
    pub fn offset_path(&self, id: NodeId) -> OffsetPath {
        self.ancestry(id)
            .into_iter()
            .map(|ancestor| self.inner.entries[ancestor.0].index)
            .collect::<Vec<_>>()
            .into()
    }

    /// Resolves an offset path against this forest.
    ///
    /// Returns `None` if the path is empty, does not start at the root, or
    /// runs past the children loaded in this forest.
    pub fn from_offset_path(&self, path: &OffsetPath) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        if *first != 0 {
            return None;
        }
        let mut current = NodeId::ROOT;
        for &index in rest {
            current = *self.child_ids(current).get(index)?;
        }
        Some(current)
    }

    /// Returns the keys from the root down to `id`.
    pub fn key_path(&self, id: NodeId) -> KeyPath {
        self.ancestry(id)
            .into_iter()
            .map(|ancestor| self.key(ancestor).to_string())
            .collect()
    }

    /// Resolves a key path against this forest, taking the first matching
    /// child at every level.
    pub fn from_key_path(&self, path: &[String]) -> Option<NodeId> {
        let (first, rest) = path.split_first()?;
        if self.key(NodeId::ROOT) != first {
            return None;
        }
        let mut current = NodeId::ROOT;
        for key in rest {
            current = *self
                .child_ids(current)
                .iter()
                .find(|&&child| self.key(child) == key)?;
        }
        Some(current)
    }

    /// Returns the nodes from the root down to `id`, both included.
    pub fn node_path(&self, id: NodeId) -> NodePath<T> {
        self.ancestry(id)
            .into_iter()
            .map(|ancestor| self.node(ancestor).clone())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Returns a new forest with the same key function and a new root.
    pub fn set_root(&self, root: T) -> Self {
        Self::with_key_fn(self.key_fn(), root)
    }

    /// Returns a new forest where the node at `path` is replaced by
    /// `update(node)`.
    ///
    /// Only the nodes between the root and the target are copied; untouched
    /// subtrees are shared with this forest.
    pub fn update_node<F>(&self, path: &OffsetPath, update: F) -> Result<Self, ForestError>
    where
        F: FnOnce(&T) -> T,
    {
        let (first, rest) = path.split_first().ok_or(ForestError::EmptyPath)?;
        if *first != 0 {
            return Err(ForestError::InvalidPath(path.clone()));
        }
        let root = update_at(self.root(), rest, update)
            .ok_or_else(|| ForestError::InvalidPath(path.clone()))?;
        Ok(self.set_root(root))
    }

    /// Returns a new forest where the children of the node at `path` are
    /// replaced by `update(children)`.
    pub fn update_children<F>(&self, path: &OffsetPath, update: F) -> Result<Self, ForestError>
    where
        F: FnOnce(Option<&[T]>) -> Option<Vec<T>>,
    {
        self.update_node(path, |node| node.set_children(update(node.children())))
    }
}

fn update_at<T, F>(node: &T, path: &[usize], update: F) -> Option<T>
where
    T: Traversable,
    F: FnOnce(&T) -> T,
{
    match path.split_first() {
        None => Some(update(node)),
        Some((&index, rest)) => {
            let children = node.children()?;
            let updated = update_at(children.get(index)?, rest, update)?;
            let mut next = children.to_vec();
            next[index] = updated;
            Some(node.set_children(Some(next)))
        }
    }
}
