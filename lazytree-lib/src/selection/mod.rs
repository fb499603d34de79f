//! Tree selections
//!
//! A [`TreeSelection`] is itself a [`KeyedForest`] laid over a source
//! forest. A selection node without children ("terminal") stands for its
//! whole source subtree, so selecting a large subtree costs a single node.
//! A selection node with children is partially selected: only the listed
//! sub-selections are included. Every function here is pure and returns a
//! new selection.

mod mode;

pub use mode::*;

use std::collections::HashSet;
use std::sync::Arc;

use crate::forest::KeyFn;
use crate::forest::KeyPath;
use crate::forest::KeyedForest;
use crate::forest::NodeId;
use crate::forest::Traversable;

/// A selection over a forest of `T`.
pub type TreeSelection<T> = KeyedForest<SelectionNode<T>>;

/// A node of a [`TreeSelection`].
///
/// Carries the source node's payload (without its source children) and the
/// selection's own children.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode<T> {
    item: T,
    children: Option<Arc<[SelectionNode<T>]>>,
}

impl<T: Traversable> SelectionNode<T> {
    /// Creates a selection node for `item` with the given sub-selections.
    pub fn new(item: &T, children: Option<Vec<SelectionNode<T>>>) -> Self {
        Self {
            item: item.set_children(None),
            children: children.map(Arc::from),
        }
    }

    /// Creates a terminal node selecting the whole subtree of `item`.
    pub fn terminal(item: &T) -> Self {
        Self::new(item, None)
    }
}

impl<T> SelectionNode<T> {
    /// Returns the selected item.
    pub fn item(&self) -> &T {
        &self.item
    }
}

impl<T: Clone> Traversable for SelectionNode<T> {
    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn set_children(&self, children: Option<Vec<Self>>) -> Self {
        Self {
            item: self.item.clone(),
            children: children.map(Arc::from),
        }
    }
}

/// Options for [`exclude_from_terminal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExcludeOptions {
    /// Keep the parent selected even when none of its children remain.
    pub leave_parent_selected: bool,
}

fn selection_key_fn<T: 'static>(key_of: KeyFn<T>) -> KeyFn<SelectionNode<T>> {
    Arc::new(move |node: &SelectionNode<T>| key_of(&node.item))
}

fn key_of_item<T: Traversable>(selection: &TreeSelection<T>, item: &T) -> String {
    selection.key_of(&SelectionNode::terminal(item))
}

/// Applies `update` to the children of a node of `selection`.
///
/// `id` always comes from `selection` itself, so the offset path resolves.
fn update_children_at<T, F>(selection: &TreeSelection<T>, id: NodeId, update: F) -> TreeSelection<T>
where
    T: Traversable,
    F: FnOnce(Option<&[SelectionNode<T>]>) -> Option<Vec<SelectionNode<T>>>,
{
    let result = selection.update_children(&selection.offset_path(id), update);
    debug_assert!(result.is_ok(), "offset path of a selection node must resolve");
    result.unwrap_or_else(|e| {
        log::warn!("Selection update failed: {}", e);
        selection.clone()
    })
}

// =============================================================================
// Construction and queries
// =============================================================================

/// Creates an empty selection over `base`.
pub fn empty<T: Traversable + 'static>(base: &KeyedForest<T>) -> TreeSelection<T> {
    KeyedForest::with_key_fn(
        selection_key_fn(base.key_fn()),
        SelectionNode::new(base.root(), Some(Vec::new())),
    )
}

/// Reinterprets a forest as a selection.
///
/// Nodes whose children are not loaded become terminal.
pub fn from_forest<T: Traversable + 'static>(forest: &KeyedForest<T>) -> TreeSelection<T> {
    fn convert<T: Traversable>(node: &T) -> SelectionNode<T> {
        let children = node
            .children()
            .map(|children| children.iter().map(convert).collect());
        SelectionNode::new(node, children)
    }
    KeyedForest::with_key_fn(selection_key_fn(forest.key_fn()), convert(forest.root()))
}

/// Returns `true` if the node selects its whole source subtree.
pub fn is_terminal<T>(node: &SelectionNode<T>) -> bool {
    node.children.is_none()
}

/// Returns `true` if nothing further is selected below the node.
///
/// Terminal nodes are leafs as well.
pub fn is_leaf<T>(node: &SelectionNode<T>) -> bool {
    node.children.as_ref().is_none_or(|children| children.is_empty())
}

/// Returns the frontier of the selection: for every key, the first selection
/// node that is a leaf, excluding the synthetic root.
pub fn leafs<T: Traversable>(selection: &TreeSelection<T>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    selection
        .iter()
        .filter(|(id, node)| !selection.is_root(*id) && is_leaf(*node))
        .filter(|(id, _)| seen.insert(selection.key(*id)))
        .map(|(id, _)| id)
        .collect()
}

/// Returns every selection node carrying `key`.
pub fn nodes_from_key<'a, T: Traversable>(
    selection: Option<&'a TreeSelection<T>>,
    key: &str,
) -> &'a [NodeId] {
    selection
        .map(|selection| selection.nodes_with_key(key))
        .unwrap_or(&[])
}

/// Returns the selection node standing for `item` on the item's own branch.
///
/// The selection is followed along the key path of `item`, so the same
/// concept under different parents resolves independently. Returns `None` if
/// the branch is not selected down to `item`, including when a terminal
/// ancestor selects it implicitly.
pub fn item_selection<T: Traversable>(
    forest: &KeyedForest<T>,
    selection: &TreeSelection<T>,
    item: NodeId,
) -> Option<NodeId> {
    selection.from_key_path(&forest.key_path(item))
}

/// Returns `true` if a strict ancestor of `item` on its own branch is
/// terminal in `selection`, i.e. `item` is selected only because that
/// ancestor's whole subtree is.
pub fn is_selected_by_default<T: Traversable>(
    forest: &KeyedForest<T>,
    selection: &TreeSelection<T>,
    item: NodeId,
) -> bool {
    let path = forest.key_path(item);
    let Some((first, rest)) = path.split_first() else {
        return false;
    };
    if selection.key(NodeId::ROOT) != first {
        return false;
    }

    let mut current = NodeId::ROOT;
    for key in rest {
        if is_terminal(selection.node(current)) {
            return true;
        }
        match selection.child_ids(current).iter().find(|&&child| selection.key(child) == key) {
            Some(&child) => current = child,
            None => return false,
        }
    }
    false
}

/// Returns `true` if an ancestor of `child` carries `parent_key`.
pub fn child_of_parent<T: Traversable>(
    forest: &KeyedForest<T>,
    child: NodeId,
    parent_key: Option<&str>,
) -> bool {
    let Some(parent_key) = parent_key else {
        return false;
    };
    let mut current = forest.parent(child);
    while let Some(parent) = current {
        if forest.key(parent) == parent_key {
            return true;
        }
        current = forest.parent(parent);
    }
    false
}

// =============================================================================
// Selecting
// =============================================================================

/// Replaces the whole selection with a single terminal node under the root.
pub fn set_to_single_terminal<T: Traversable>(selection: &TreeSelection<T>, item: &T) -> TreeSelection<T> {
    let node = SelectionNode::terminal(item);
    update_children_at(selection, NodeId::ROOT, |_| Some(vec![node]))
}

/// Merges a source forest path (see [`KeyedForest::node_path`]) into the
/// selection.
///
/// Existing branches are followed by key and by identical parent, so the
/// same concept under different parents stays distinct. Selecting below an
/// already terminal node changes nothing. The unmatched rest of the path is
/// appended as a new branch ending in a non-terminal leaf.
pub fn select<T: Traversable>(selection: &TreeSelection<T>, path: &[T]) -> TreeSelection<T> {
    let mut parent: Option<NodeId> = None;
    let mut matched = 0;

    for node in path {
        let key = key_of_item(selection, node);
        let branch = selection
            .nodes_with_key(&key)
            .iter()
            .copied()
            .find(|&candidate| selection.parent(candidate) == parent);
        let Some(branch) = branch else {
            break;
        };
        if is_terminal(selection.node(branch)) {
            return selection.clone();
        }
        parent = Some(branch);
        matched += 1;
    }

    let added = &path[matched..];
    if added.is_empty() {
        return selection.clone();
    }
    let Some(parent) = parent else {
        log::warn!("Selected path does not start at the selection root");
        return selection.clone();
    };

    let branch = added.iter().rev().fold(None, |previous, node| {
        Some(SelectionNode::new(node, Some(previous.into_iter().collect())))
    });

    update_children_at(selection, parent, |children| {
        let mut next = children.map(<[_]>::to_vec).unwrap_or_default();
        next.extend(branch);
        Some(next)
    })
}

/// Collapses every node carrying `key` into a terminal node.
pub fn make_terminal<T: Traversable>(selection: &TreeSelection<T>, key: &str) -> TreeSelection<T> {
    let paths: Vec<_> = selection
        .nodes_with_key(key)
        .iter()
        .map(|&id| selection.offset_path(id))
        .collect();

    // collapsing a node only removes its descendants, so paths to other
    // nodes stay valid and paths below a collapsed node stop resolving
    paths.iter().fold(selection.clone(), |acc, path| {
        acc.update_children(path, |_| None).unwrap_or(acc)
    })
}

/// Selects the whole subtree at the end of `path`.
pub fn select_terminal<T: Traversable>(selection: &TreeSelection<T>, path: &[T]) -> TreeSelection<T> {
    let Some(last) = path.last() else {
        return selection.clone();
    };
    let key = key_of_item(selection, last);
    make_terminal(&select(selection, path), &key)
}

/// Selects `subtree` as terminal and keeps collapsing parents to terminal
/// while every child of the parent (as loaded in `forest`) is selected.
pub fn select_and_collapse_to_terminal<T: Traversable>(
    selection: &TreeSelection<T>,
    forest: &KeyedForest<T>,
    subtree: NodeId,
) -> TreeSelection<T> {
    let with_subtree = select_terminal(selection, &forest.node_path(subtree));
    let parent = match forest.parent(subtree) {
        Some(parent) if !forest.is_root(parent) => parent,
        _ => return with_subtree,
    };

    let all_children_selected = forest
        .child_ids(parent)
        .iter()
        .all(|&child| item_selection(forest, &with_subtree, child).is_some());

    if all_children_selected {
        select_and_collapse_to_terminal(&with_subtree, forest, parent)
    } else {
        with_subtree
    }
}

// =============================================================================
// Unselecting
// =============================================================================

/// Removes every selection node carrying `key`.
///
/// For each occurrence the highest ancestor that has no other selected
/// children is pruned, so no empty branches are left behind. Unselecting a
/// terminal root turns it into an explicitly empty root.
pub fn unselect<T: Traversable>(selection: &TreeSelection<T>, key: &str) -> TreeSelection<T> {
    let mut current = selection.clone();
    loop {
        let Some(&unselected) = current.nodes_with_key(key).first() else {
            return current;
        };

        if current.is_root(unselected) {
            return if is_terminal(current.root()) {
                current.set_root(current.root().set_children(Some(Vec::new())))
            } else {
                current
            };
        }

        let ancestry = current.ancestry(unselected);
        let mut removed = unselected;
        for &ancestor in ancestry.iter().rev().skip(1) {
            if current.is_root(ancestor) || current.child_ids(ancestor).len() > 1 {
                break;
            }
            removed = ancestor;
        }

        current = exclude_node(&current, removed);
    }
}

fn exclude_node<T: Traversable>(selection: &TreeSelection<T>, node: NodeId) -> TreeSelection<T> {
    let Some(parent) = selection.parent(node) else {
        return selection.clone();
    };
    let position = selection.child_ids(parent).iter().position(|&child| child == node);
    update_children_at(selection, parent, |children| {
        let mut next = children.map(<[_]>::to_vec).unwrap_or_default();
        if let Some(position) = position {
            next.remove(position);
        }
        Some(next)
    })
}

/// Turns a node that is selected only through a terminal ancestor into an
/// explicit exclusion: the ancestors are materialized into partial
/// selections listing every sibling as terminal, except `default_selected`.
///
/// If the parent ends up with no selected children it is excluded from its
/// own parent in turn, unless `options.leave_parent_selected` is set.
pub fn exclude_from_terminal<T: Traversable>(
    selection: &TreeSelection<T>,
    forest: &KeyedForest<T>,
    default_selected: NodeId,
    options: ExcludeOptions,
) -> TreeSelection<T> {
    let Some(parent) = forest.parent(default_selected) else {
        return selection.clone();
    };
    let parent_path = forest.key_path(parent);
    let target_key = forest.key(default_selected).to_string();

    let materialized = materialize_terminal_children(selection, forest, &parent_path);
    let Some(selected_parent) = materialized.from_key_path(&parent_path) else {
        return materialized;
    };

    let key_of = materialized.key_fn();
    let next = update_children_at(&materialized, selected_parent, |children| {
        children.map(|children| {
            children
                .iter()
                .filter(|child| key_of(*child) != target_key)
                .cloned()
                .collect()
        })
    });

    let parent_emptied = next
        .from_key_path(&parent_path)
        .is_some_and(|id| !is_terminal(next.node(id)) && next.child_ids(id).is_empty());

    if parent_emptied && !options.leave_parent_selected {
        exclude_from_terminal(&next, forest, parent, options)
    } else {
        next
    }
}

/// Makes sure the selection node at `path` exists and, if it is terminal,
/// replaces it by the list of its source children, each terminal.
fn materialize_terminal_children<T: Traversable>(
    selection: &TreeSelection<T>,
    forest: &KeyedForest<T>,
    path: &KeyPath,
) -> TreeSelection<T> {
    let mut selection = selection.clone();
    if selection.from_key_path(path).is_none() {
        if path.len() <= 1 {
            return selection;
        }
        let parent_path = path[..path.len() - 1].to_vec();
        selection = materialize_terminal_children(&selection, forest, &parent_path);
    }

    let (Some(source), Some(selected)) = (forest.from_key_path(path), selection.from_key_path(path)) else {
        return selection;
    };
    if !is_terminal(selection.node(selected)) {
        return selection;
    }

    let children: Vec<SelectionNode<T>> = forest
        .node(source)
        .children()
        .unwrap_or(&[])
        .iter()
        .map(SelectionNode::terminal)
        .collect();
    update_children_at(&selection, selected, |_| Some(children))
}
