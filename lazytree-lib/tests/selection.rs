use lazytree_lib::forest::{KeyedForest, NodeId};
use lazytree_lib::model::Node;
use lazytree_lib::selection::{self, ExcludeOptions, TreeSelection};

/// root
/// ├── a
/// │   ├── a1
/// │   └── a2
/// ├── b
/// │   └── b1
/// └── c
///     └── a1
fn sample() -> KeyedForest<Node> {
    Node::forest_from_roots(vec![
        Node::new("a").with_children(vec![Node::new("a1"), Node::new("a2")]),
        Node::new("b").with_children(vec![Node::new("b1")]),
        Node::new("c").with_children(vec![Node::new("a1")]),
    ])
}

fn id(forest: &KeyedForest<Node>, key: &str) -> NodeId {
    forest.get_first(key).unwrap()
}

fn leaf_keys(selection: &TreeSelection<Node>) -> Vec<String> {
    let mut keys: Vec<String> = selection::leafs(selection)
        .into_iter()
        .map(|id| selection.key(id).to_string())
        .collect();
    keys.sort();
    keys
}

fn is_terminal(selection: &TreeSelection<Node>, key: &str) -> bool {
    selection
        .nodes_with_key(key)
        .iter()
        .any(|&id| selection::is_terminal(selection.node(id)))
}

// ============================================================================
// Selecting
// ============================================================================

#[test]
fn test_empty_selection() {
    let forest = sample();
    let selection = selection::empty(&forest);
    assert!(selection.is_empty());
    assert!(selection::leafs(&selection).is_empty());
    assert!(selection::nodes_from_key(None::<&TreeSelection<Node>>, "a").is_empty());
}

#[test]
fn test_select_terminal() {
    let forest = sample();
    let a = id(&forest, "a");
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(a));

    assert_eq!(leaf_keys(&selection), vec!["a"]);
    assert!(is_terminal(&selection, "a"));
    assert!(selection::is_selected_by_default(&forest, &selection, id(&forest, "a1")));
    assert!(!selection::is_selected_by_default(&forest, &selection, a));
}

#[test]
fn test_select_below_terminal_is_noop() {
    let forest = sample();
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(id(&forest, "a")));
    let again = selection::select_terminal(&selection, &forest.node_path(id(&forest, "a1")));
    assert_eq!(leaf_keys(&again), vec!["a"]);
    assert_eq!(again.len(), selection.len());
}

#[test]
fn test_select_keeps_parents_distinct() {
    let forest = sample();
    let occurrences = forest.nodes_with_key("a1").to_vec();
    let under_c = occurrences[1];
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(under_c));

    assert!(selection.contains_key("c"));
    assert!(!selection.contains_key("a"));
    assert_eq!(selection.nodes_with_key("a1").len(), 1);
}

#[test]
fn test_select_is_idempotent() {
    let forest = sample();
    let path = forest.node_path(id(&forest, "a1"));
    let once = selection::select(&selection::empty(&forest), &path);
    let twice = selection::select(&once, &path);

    assert_eq!(once.len(), 3);
    assert_eq!(twice.len(), once.len());
    assert_eq!(twice.root(), once.root());

    // a plain select ends in an explicitly empty leaf, not a terminal one
    let a1 = once.get_first("a1").unwrap();
    assert!(!selection::is_terminal(once.node(a1)));
    assert!(selection::is_leaf(once.node(a1)));
    assert_eq!(leaf_keys(&twice), vec!["a1"]);
}

#[test]
fn test_default_selection_follows_branch() {
    let forest = sample();
    let a = id(&forest, "a");
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(a));

    let occurrences = forest.nodes_with_key("a1").to_vec();
    assert!(selection::is_selected_by_default(&forest, &selection, occurrences[0]));
    assert!(!selection::is_selected_by_default(&forest, &selection, occurrences[1]));
    assert!(selection::item_selection(&forest, &selection, occurrences[1]).is_none());
    assert!(selection::item_selection(&forest, &selection, a).is_some());
}

#[test]
fn test_select_and_collapse_to_terminal() {
    let forest = sample();
    let empty = selection::empty(&forest);

    let one = selection::select_and_collapse_to_terminal(&empty, &forest, id(&forest, "a1"));
    assert!(is_terminal(&one, "a1"));
    assert!(!is_terminal(&one, "a"));

    let both = selection::select_and_collapse_to_terminal(&one, &forest, id(&forest, "a2"));
    assert!(is_terminal(&both, "a"));
    assert_eq!(leaf_keys(&both), vec!["a"]);
}

#[test]
fn test_set_to_single_terminal() {
    let forest = sample();
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(id(&forest, "a")));
    let replaced = selection::set_to_single_terminal(&selection, forest.node(id(&forest, "b")));
    assert_eq!(leaf_keys(&replaced), vec!["b"]);
}

#[test]
fn test_from_forest() {
    let forest = sample();
    let selection = selection::from_forest(&forest);
    assert_eq!(leaf_keys(&selection), vec!["a1", "a2", "b1"]);
    assert!(is_terminal(&selection, "b1"));
    assert!(!is_terminal(&selection, "b"));
}

// ============================================================================
// Unselecting
// ============================================================================

#[test]
fn test_unselect_prunes_empty_branch() {
    let forest = sample();
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(id(&forest, "a1")));
    let unselected = selection::unselect(&selection, "a1");

    assert!(unselected.is_empty());
    assert!(!unselected.contains_key("a"));
}

#[test]
fn test_unselect_keeps_other_children() {
    let forest = sample();
    let empty = selection::empty(&forest);
    let one = selection::select_terminal(&empty, &forest.node_path(id(&forest, "a1")));
    let two = selection::select_terminal(&one, &forest.node_path(id(&forest, "a2")));

    let unselected = selection::unselect(&two, "a1");
    assert_eq!(leaf_keys(&unselected), vec!["a2"]);
}

#[test]
fn test_unselect_every_occurrence() {
    let forest = sample();
    let occurrences = forest.nodes_with_key("a1").to_vec();
    let mut selection = selection::empty(&forest);
    for occurrence in occurrences {
        selection = selection::select_terminal(&selection, &forest.node_path(occurrence));
    }
    assert_eq!(selection.nodes_with_key("a1").len(), 2);

    let unselected = selection::unselect(&selection, "a1");
    assert!(unselected.is_empty());
}

// ============================================================================
// Excluding
// ============================================================================

#[test]
fn test_exclude_from_terminal() {
    let forest = sample();
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(id(&forest, "a")));
    let excluded =
        selection::exclude_from_terminal(&selection, &forest, id(&forest, "a1"), ExcludeOptions::default());

    assert!(!excluded.contains_key("a1"));
    assert!(!is_terminal(&excluded, "a"));
    assert_eq!(leaf_keys(&excluded), vec!["a2"]);
}

#[test]
fn test_exclude_last_child_removes_parent() {
    let forest = sample();
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(id(&forest, "b")));
    let excluded =
        selection::exclude_from_terminal(&selection, &forest, id(&forest, "b1"), ExcludeOptions::default());

    assert!(excluded.is_empty());
}

#[test]
fn test_exclude_last_child_leaving_parent_selected() {
    let forest = sample();
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(id(&forest, "b")));
    let options = ExcludeOptions {
        leave_parent_selected: true,
    };
    let excluded = selection::exclude_from_terminal(&selection, &forest, id(&forest, "b1"), options);

    assert!(excluded.contains_key("b"));
    assert!(!excluded.contains_key("b1"));
}

#[test]
fn test_exclude_below_terminal_grandparent() {
    let forest = Node::forest_from_roots(vec![Node::new("x").with_children(vec![
        Node::new("y").with_children(vec![Node::new("y1"), Node::new("y2")]),
        Node::new("z"),
    ])]);
    let x = id(&forest, "x");
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(x));

    let excluded =
        selection::exclude_from_terminal(&selection, &forest, id(&forest, "y1"), ExcludeOptions::default());
    assert_eq!(leaf_keys(&excluded), vec!["y2", "z"]);
}

#[test]
fn test_exclude_then_collapse_restores_terminal() {
    let forest = sample();
    let a = id(&forest, "a");
    let selection = selection::select_terminal(&selection::empty(&forest), &forest.node_path(a));
    let excluded =
        selection::exclude_from_terminal(&selection, &forest, id(&forest, "a2"), ExcludeOptions::default());

    let restored = selection::select_and_collapse_to_terminal(&excluded, &forest, id(&forest, "a2"));
    assert!(is_terminal(&restored, "a"));
    assert_eq!(leaf_keys(&restored), leaf_keys(&selection));
}
