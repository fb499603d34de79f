//! Selection policies translating clicks into selection changes

use crate::forest::KeyedForest;
use crate::forest::NodeId;
use crate::forest::Traversable;

use super::ExcludeOptions;
use super::TreeSelection;
use super::child_of_parent;
use super::empty;
use super::exclude_from_terminal;
use super::is_leaf;
use super::item_selection;
use super::select;
use super::select_and_collapse_to_terminal;
use super::select_terminal;
use super::unselect;

/// Rendered check state of a tree item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    /// Not selected.
    #[default]
    None,
    /// Some descendants are selected.
    Partial,
    /// Selected.
    Full,
    /// Selected because an ancestor's whole subtree is; not toggleable on
    /// its own.
    FullGreyedOut,
}

/// How a click on a tree item changes the selection.
///
/// The mode is a plain value: [`change`](Self::change) never mutates it but
/// returns the next mode alongside the next selection. Only
/// [`SinglePartialSubtree`](Self::SinglePartialSubtree) actually carries
/// state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    /// One subtree at a time; clicking a node selects exactly its subtree,
    /// clicking the selected node clears the selection.
    SingleFullSubtree,
    /// Any number of whole subtrees, toggled independently. Items selected
    /// through an ancestor cannot be toggled.
    MultipleFullSubtrees,
    /// Any number of subtrees; clicking an item selected through an ancestor
    /// excludes just that item.
    MultiplePartialSubtrees,
    /// One tracked subtree root whose descendants can be toggled one by one.
    SinglePartialSubtree {
        /// Key of the tracked subtree root.
        selected_root_key: Option<String>,
    },
}

/// Result of [`SelectionMode::change`].
#[derive(Debug)]
pub struct ModeChange<T> {
    /// Mode state to use for the next click.
    pub mode: SelectionMode,
    /// New selection, or `None` if the click changes nothing.
    pub selection: Option<TreeSelection<T>>,
}

impl SelectionMode {
    /// Creates a single partial subtree mode with nothing tracked yet.
    pub fn single_partial_subtree() -> Self {
        Self::SinglePartialSubtree {
            selected_root_key: None,
        }
    }

    /// Returns the tracked subtree root key.
    pub fn selected_root_key(&self) -> Option<&str> {
        match self {
            Self::SinglePartialSubtree { selected_root_key } => selected_root_key.as_deref(),
            _ => None,
        }
    }

    /// Derives the check state of `item`.
    ///
    /// `default_selected` tells whether `item` is selected only through a
    /// terminal ancestor (see
    /// [`is_selected_by_default`](super::is_selected_by_default)).
    pub fn render_selected<T: Traversable>(
        &self,
        forest: &KeyedForest<T>,
        selection: &TreeSelection<T>,
        item: NodeId,
        default_selected: bool,
    ) -> CheckState {
        match self {
            Self::SingleFullSubtree | Self::MultiplePartialSubtrees => {
                render_by_leafs(forest, selection, item, default_selected, CheckState::Full)
            }
            Self::MultipleFullSubtrees => {
                render_by_leafs(forest, selection, item, default_selected, CheckState::FullGreyedOut)
            }
            Self::SinglePartialSubtree { selected_root_key } => {
                let root_key = selected_root_key.as_deref();
                if root_key.is_some() && !inside_subtree(forest, item, root_key) {
                    return CheckState::None;
                }
                render_by_leafs(forest, selection, item, default_selected, CheckState::Full)
            }
        }
    }

    /// Computes the effect of clicking `item`.
    pub fn change<T: Traversable + 'static>(
        &self,
        forest: &KeyedForest<T>,
        previous: &TreeSelection<T>,
        item: NodeId,
        default_selected: bool,
    ) -> ModeChange<T> {
        let key = forest.key(item);
        let selected = item_selection(forest, previous, item).is_some_and(|id| is_leaf(previous.node(id)));

        let selection = match self {
            Self::SingleFullSubtree => {
                if selected {
                    Some(empty(forest))
                } else {
                    Some(select_terminal(&empty(forest), &forest.node_path(item)))
                }
            }
            Self::MultipleFullSubtrees => {
                if default_selected {
                    None
                } else if selected {
                    Some(unselect(previous, key))
                } else {
                    Some(select_terminal(previous, &forest.node_path(item)))
                }
            }
            Self::MultiplePartialSubtrees => {
                if default_selected {
                    Some(exclude_from_terminal(previous, forest, item, ExcludeOptions::default()))
                } else if selected {
                    Some(unselect(previous, key))
                } else {
                    Some(select_and_collapse_to_terminal(previous, forest, item))
                }
            }
            Self::SinglePartialSubtree { selected_root_key } => {
                return change_single_partial(
                    forest,
                    previous,
                    item,
                    default_selected,
                    selected,
                    selected_root_key.as_deref(),
                );
            }
        };

        ModeChange {
            mode: self.clone(),
            selection,
        }
    }
}

fn render_by_leafs<T: Traversable>(
    forest: &KeyedForest<T>,
    selection: &TreeSelection<T>,
    item: NodeId,
    default_selected: bool,
    default_state: CheckState,
) -> CheckState {
    match item_selection(forest, selection, item) {
        Some(id) if is_leaf(selection.node(id)) => CheckState::Full,
        _ if default_selected => default_state,
        Some(_) => CheckState::Partial,
        None => CheckState::None,
    }
}

fn inside_subtree<T: Traversable>(forest: &KeyedForest<T>, item: NodeId, root_key: Option<&str>) -> bool {
    root_key == Some(forest.key(item)) || child_of_parent(forest, item, root_key)
}

fn change_single_partial<T: Traversable + 'static>(
    forest: &KeyedForest<T>,
    previous: &TreeSelection<T>,
    item: NodeId,
    default_selected: bool,
    selected: bool,
    root_key: Option<&str>,
) -> ModeChange<T> {
    let key = forest.key(item);

    if root_key == Some(key) {
        return ModeChange {
            mode: SelectionMode::single_partial_subtree(),
            selection: Some(empty(forest)),
        };
    }

    let Some(root_key) = root_key.filter(|&root_key| child_of_parent(forest, item, Some(root_key))) else {
        return ModeChange {
            mode: SelectionMode::SinglePartialSubtree {
                selected_root_key: Some(key.to_string()),
            },
            selection: Some(select_terminal(&empty(forest), &forest.node_path(item))),
        };
    };

    let selection = if default_selected {
        let options = ExcludeOptions {
            leave_parent_selected: true,
        };
        exclude_from_terminal(previous, forest, item, options)
    } else if selected {
        unselect_inside(forest, previous, item, root_key)
    } else {
        select_and_collapse_to_terminal(previous, forest, item)
    };

    ModeChange {
        mode: SelectionMode::SinglePartialSubtree {
            selected_root_key: Some(root_key.to_string()),
        },
        selection: Some(selection),
    }
}

/// Unselects `item`; if that pruned its parent although the parent has other
/// children, the parent is selected again so the tracked subtree keeps it.
fn unselect_inside<T: Traversable>(
    forest: &KeyedForest<T>,
    previous: &TreeSelection<T>,
    item: NodeId,
    root_key: &str,
) -> TreeSelection<T> {
    let next = unselect(previous, forest.key(item));
    let Some(parent) = forest.parent(item) else {
        return next;
    };

    let has_siblings = forest.child_ids(parent).len() > 1;
    if has_siblings
        && item_selection(forest, &next, parent).is_none()
        && inside_subtree(forest, parent, Some(root_key))
    {
        select(&next, &forest.node_path(parent))
    } else {
        next
    }
}
