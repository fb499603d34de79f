use lazytree_lib::error::ForestError;
use lazytree_lib::forest::{KeyedForest, NodeId, OffsetPath, Traversable, map_bottom_up};
use lazytree_lib::model::Node;

fn sample() -> KeyedForest<Node> {
    Node::forest_from_roots(vec![
        Node::new("a").with_children(vec![Node::new("a1"), Node::new("a2")]),
        Node::new("b").with_children(vec![Node::new("a1")]),
    ])
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn test_every_node_indexed() {
    let forest = sample();
    for (id, node) in forest.iter() {
        let key = Node::key_of(node);
        assert!(forest.nodes_with_key(&key).contains(&id));
    }
}

#[test]
fn test_parent_and_children() {
    let forest = sample();
    let a = forest.get_first("a").unwrap();
    let a2 = forest.get_first("a2").unwrap();

    assert_eq!(forest.parent(a2), Some(a));
    assert_eq!(forest.parent(a), Some(NodeId::ROOT));
    assert_eq!(forest.parent(NodeId::ROOT), None);
    assert_eq!(forest.child_ids(a).len(), 2);
}

#[test]
fn test_polyhierarchy_keeps_both_occurrences() {
    let forest = sample();
    let occurrences = forest.nodes_with_key("a1");
    assert_eq!(occurrences.len(), 2);

    let parents: Vec<&str> = occurrences
        .iter()
        .map(|&id| forest.key(forest.parent(id).unwrap()))
        .collect();
    assert_eq!(parents, vec!["a", "b"]);
}

#[test]
fn test_empty_forest() {
    let forest = Node::empty_forest();
    assert!(forest.is_empty());
    assert_eq!(forest.len(), 1);
    assert_eq!(forest.key(NodeId::ROOT), Node::ROOT_KEY);
}

// ============================================================================
// Paths
// ============================================================================

#[test]
fn test_offset_path_round_trip() {
    let forest = sample();
    for (id, _) in forest.iter() {
        let path = forest.offset_path(id);
        assert_eq!(path[0], 0);
        assert_eq!(forest.from_offset_path(&path), Some(id));
    }
}

#[test]
fn test_key_path_round_trip() {
    let forest = sample();
    let a2 = forest.get_first("a2").unwrap();
    let path = forest.key_path(a2);
    assert_eq!(path, vec![Node::ROOT_KEY, "a", "a2"]);
    assert_eq!(forest.from_key_path(&path), Some(a2));
}

#[test]
fn test_node_path() {
    let forest = sample();
    let a2 = forest.get_first("a2").unwrap();
    let keys: Vec<String> = forest.node_path(a2).iter().map(Node::key_of).collect();
    assert_eq!(keys, vec![Node::ROOT_KEY, "a", "a2"]);
}

#[test]
fn test_offset_path_not_starting_at_root() {
    let forest = sample();
    assert_eq!(forest.from_offset_path(&OffsetPath::new(vec![1, 0])), None);
    assert_eq!(forest.from_offset_path(&OffsetPath::default()), None);
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn test_update_node_reindexes() {
    let forest = sample();
    let a = forest.get_first("a").unwrap();
    let updated = forest
        .update_children(&forest.offset_path(a), |children| {
            let mut next = children.map(<[_]>::to_vec).unwrap_or_default();
            next.push(Node::new("a3"));
            Some(next)
        })
        .unwrap();

    assert!(updated.get_first("a3").is_some());
    assert!(forest.get_first("a3").is_none());
    assert_eq!(updated.len(), forest.len() + 1);
}

#[test]
fn test_update_root() {
    let forest = sample();
    let updated = forest
        .update_node(&OffsetPath::root(), |root| Node {
            expanded: true,
            ..root.clone()
        })
        .unwrap();
    assert!(updated.root().expanded);
    assert_eq!(updated.len(), forest.len());
}

#[test]
fn test_update_with_empty_path_fails() {
    let forest = sample();
    let result = forest.update_children(&OffsetPath::default(), |_| None);
    assert_eq!(result.unwrap_err(), ForestError::EmptyPath);
}

#[test]
fn test_set_root_keeps_key_function() {
    let forest = sample();
    let replaced = forest.set_root(Node::root().with_children(vec![Node::new("x")]));
    assert!(replaced.get_first("x").is_some());
    assert_eq!(replaced.key_of(&Node::new("y")), "y");
}

#[test]
fn test_map_bottom_up_sees_mapped_children() {
    let forest = sample();
    // label every node with its number of loaded descendants
    let mapped = map_bottom_up(forest.root(), &mut |node: Node| {
        let count: usize = node
            .children()
            .unwrap_or(&[])
            .iter()
            .map(|child| 1 + child.label_text().parse::<usize>().unwrap_or(0))
            .sum();
        node.with_label(count.to_string())
    });
    assert_eq!(mapped.label_text(), "5");
}
