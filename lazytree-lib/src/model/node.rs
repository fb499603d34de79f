//! Tree node payload

use std::sync::Arc;

use crate::error::QueryError;
use crate::forest::KeyedForest;
use crate::forest::Traversable;

use super::Iri;
use super::Literal;

/// A node of a lazily loaded concept tree.
///
/// `children == None` means the children have not been loaded yet, while
/// `Some` with an empty slice is a confirmed leaf. Nodes are immutable
/// values: changes go through [`KeyedForest::update_node`], which produces a
/// new forest.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Resource identifier; also the node key.
    pub iri: Iri,
    /// Display label, if the service returned one.
    pub label: Option<Literal>,
    /// Loaded children.
    pub children: Option<Arc<[Node]>>,
    /// Whether the node is shown expanded.
    pub expanded: bool,
    /// Whether a page of children is being fetched.
    pub loading: bool,
    /// Error that stopped the last page request.
    pub error: Option<QueryError>,
    /// Whether more pages of children may exist beyond the loaded ones.
    pub has_more_items: bool,
    /// Search relevance.
    pub score: Option<f64>,
}

impl Node {
    /// Key of the synthetic root node.
    pub const ROOT_KEY: &'static str = "tree:root";

    /// Creates a node whose children are not loaded yet.
    pub fn new(iri: impl Into<Iri>) -> Self {
        Self {
            iri: iri.into(),
            label: None,
            children: None,
            expanded: false,
            loading: false,
            error: None,
            has_more_items: true,
            score: None,
        }
    }

    /// Creates the synthetic root, ready to load its first page.
    pub fn root() -> Self {
        Self::new(Self::ROOT_KEY)
    }

    /// Creates the synthetic root with no children and nothing left to load.
    pub fn empty_root() -> Self {
        Self::root().with_children(Vec::new()).with_more_items(false)
    }

    /// Sets the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(Literal::new(label));
        self
    }

    /// Sets loaded children.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children.into());
        self
    }

    /// Sets whether more children may be fetched.
    pub fn with_more_items(mut self, has_more_items: bool) -> Self {
        self.has_more_items = has_more_items;
        self
    }

    /// Sets the search relevance.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Key function used by every node forest: the IRI string.
    pub fn key_of(node: &Node) -> String {
        node.iri.as_str().to_string()
    }

    /// Returns `true` for the synthetic root.
    pub fn is_root(&self) -> bool {
        self.iri.as_str() == Self::ROOT_KEY
    }

    /// Returns the label text, falling back to the IRI.
    pub fn label_text(&self) -> &str {
        match &self.label {
            Some(label) => label.as_str(),
            None => self.iri.as_str(),
        }
    }

    /// Returns the number of loaded children.
    pub fn loaded_count(&self) -> usize {
        self.children.as_ref().map_or(0, |c| c.len())
    }

    /// Forest whose root still has to fetch its first page.
    pub fn ready_to_load_forest() -> KeyedForest<Node> {
        KeyedForest::create(Node::key_of, Node::root())
    }

    /// Forest with an empty, fully loaded root.
    pub fn empty_forest() -> KeyedForest<Node> {
        KeyedForest::create(Node::key_of, Node::empty_root())
    }

    /// Forest whose root holds the given top-level nodes.
    pub fn forest_from_roots(roots: Vec<Node>) -> KeyedForest<Node> {
        let root = Node::root().with_children(roots).with_more_items(false);
        KeyedForest::create(Node::key_of, root)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::root()
    }
}

impl Traversable for Node {
    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }

    fn set_children(&self, children: Option<Vec<Self>>) -> Self {
        Self {
            children: children.map(Arc::from),
            ..self.clone()
        }
    }
}
