//! Directed graph utilities for reconstructing forests
//!
//! Ancestor resolution may discover a polyhierarchy or even cycles, so
//! nodes are first collected into an arena [`Graph`] where edges are plain
//! indices. The graph is then sanitized with [`break_graph_cycles`] and
//! [`transitive_reduction`] before [`find_roots`] yields the top level of
//! the forest.

use std::collections::HashSet;

/// Index of a node inside one [`Graph`].
pub type GraphIndex = usize;

/// An arena digraph with ordered, duplicate-free edges.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: Vec<N>,
    children: Vec<Vec<GraphIndex>>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl<N> Graph<N> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node without edges and returns its index.
    pub fn add_node(&mut self, node: N) -> GraphIndex {
        self.nodes.push(node);
        self.children.push(Vec::new());
        self.nodes.len() - 1
    }

    /// Adds the edge `parent -> child`.
    ///
    /// Returns `false` if the edge already existed.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn add_edge(&mut self, parent: GraphIndex, child: GraphIndex) -> bool {
        assert!(child < self.nodes.len(), "edge target out of range");
        if self.has_edge(parent, child) {
            return false;
        }
        self.children[parent].push(child);
        true
    }

    /// Removes the edge `parent -> child`, keeping the order of the rest.
    pub fn remove_edge(&mut self, parent: GraphIndex, child: GraphIndex) -> bool {
        let edges = &mut self.children[parent];
        match edges.iter().position(|&c| c == child) {
            Some(position) => {
                edges.remove(position);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if the edge `parent -> child` exists.
    pub fn has_edge(&self, parent: GraphIndex, child: GraphIndex) -> bool {
        self.children[parent].contains(&child)
    }

    /// Returns the children of a node in insertion order.
    pub fn children(&self, index: GraphIndex) -> &[GraphIndex] {
        &self.children[index]
    }

    /// Returns the payload of a node.
    pub fn node(&self, index: GraphIndex) -> &N {
        &self.nodes[index]
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all edges as `(parent, child)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (GraphIndex, GraphIndex)> + '_ {
        self.children
            .iter()
            .enumerate()
            .flat_map(|(parent, children)| children.iter().map(move |&child| (parent, child)))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Grey,
    Black,
}

/// Removes every back edge found by a depth-first search started from each
/// node in index order, leaving an acyclic graph.
///
/// The removed set depends on node and edge order and is not guaranteed to
/// be minimal. Returns the removed edges.
pub fn break_graph_cycles<N>(graph: &mut Graph<N>) -> Vec<(GraphIndex, GraphIndex)> {
    let mut color = vec![Color::White; graph.len()];
    let mut back_edges = Vec::new();

    for start in 0..graph.len() {
        if color[start] != Color::White {
            continue;
        }
        color[start] = Color::Grey;
        let mut stack: Vec<(GraphIndex, usize)> = vec![(start, 0)];

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            match graph.children(node).get(next) {
                Some(&child) => {
                    top.1 += 1;
                    match color[child] {
                        Color::Grey => back_edges.push((node, child)),
                        Color::White => {
                            color[child] = Color::Grey;
                            stack.push((child, 0));
                        }
                        Color::Black => {}
                    }
                }
                None => {
                    color[node] = Color::Black;
                    stack.pop();
                }
            }
        }
    }

    for &(parent, child) in &back_edges {
        log::trace!("Removing back edge {} -> {}", parent, child);
        graph.remove_edge(parent, child);
    }
    back_edges
}

/// Removes every edge `u -> v` for which another path from `u` to `v`
/// exists. Returns the removed edges.
///
/// The graph must be acyclic; run [`break_graph_cycles`] first.
pub fn transitive_reduction<N>(graph: &mut Graph<N>) -> Vec<(GraphIndex, GraphIndex)> {
    let mut redundant = Vec::new();

    for node in 0..graph.len() {
        let direct: HashSet<GraphIndex> = graph.children(node).iter().copied().collect();
        let mut marked: HashSet<GraphIndex> = HashSet::new();
        let mut visited: HashSet<GraphIndex> = HashSet::new();

        for &child in graph.children(node) {
            // every descendant of a direct child is reachable by a longer path
            let mut stack: Vec<GraphIndex> = graph.children(child).to_vec();
            while let Some(descendant) = stack.pop() {
                if !visited.insert(descendant) {
                    continue;
                }
                if direct.contains(&descendant) {
                    marked.insert(descendant);
                }
                stack.extend_from_slice(graph.children(descendant));
            }
        }

        redundant.extend(
            graph
                .children(node)
                .iter()
                .filter(|child| marked.contains(child))
                .map(|&child| (node, child)),
        );
    }

    for &(parent, child) in &redundant {
        log::trace!("Removing redundant edge {} -> {}", parent, child);
        graph.remove_edge(parent, child);
    }
    redundant
}

/// Returns the nodes without incoming edges, in index order.
pub fn find_roots<N>(graph: &Graph<N>) -> Vec<GraphIndex> {
    let mut has_parent = vec![false; graph.len()];
    for (_, child) in graph.edges() {
        has_parent[child] = true;
    }
    (0..graph.len()).filter(|&i| !has_parent[i]).collect()
}
