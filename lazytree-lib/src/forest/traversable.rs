//! Node shape shared by every forest

/// A tree node exposing an optional ordered list of children.
///
/// `None` children means "not known", which is distinct from an empty list.
/// Implementations must be cheap to clone: forests hold one clone of every
/// node in their index, and updates copy the path from the root to the
/// changed node.
pub trait Traversable: Clone {
    /// Returns the children, if known.
    fn children(&self) -> Option<&[Self]>;

    /// Returns a copy of this node with its children replaced.
    fn set_children(&self, children: Option<Vec<Self>>) -> Self;
}

/// Rebuilds a tree by applying `f` to every node, children first.
///
/// `f` receives a node whose children have already been mapped.
pub fn map_bottom_up<T, F>(root: &T, f: &mut F) -> T
where
    T: Traversable,
    F: FnMut(T) -> T,
{
    match root.children() {
        Some(children) => {
            let mapped: Vec<T> = children.iter().map(|child| map_bottom_up(child, f)).collect();
            f(root.set_children(Some(mapped)))
        }
        None => f(root.clone()),
    }
}
