//! Loading node forests from a remote tree service
//!
//! The free functions implement the individual steps (paging children,
//! restoring ancestors of leafs). [`NodeModel`] bundles them with a
//! [`TreeQueryService`], an optional [`LabelService`] and a [`TreeConfig`].
//!
//! Every asynchronous operation takes a [`CancellationToken`]. Cancelling it
//! guarantees that no result of the cancelled request reaches a forest.

mod children;
mod restore;
mod search;

pub use children::*;
pub use restore::*;
pub use search::SearchOutcome;
pub use search::SearchResult;

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::api::LabelService;
use crate::api::TreeQueryService;
use crate::config::TreeConfig;
use crate::error::Error;
use crate::error::ForestError;
use crate::error::QueryError;
use crate::forest::KeyedForest;
use crate::forest::OffsetPath;
use crate::model::Iri;
use crate::model::Literal;
use crate::model::Node;
use crate::selection;
use crate::selection::TreeSelection;

use search::conforms_to_min_length;
use search::leafs_from_search_result;

/// Loads and restores node forests.
///
/// This type is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// let model = NodeModel::builder()
///     .service(MySparqlService::new(endpoint))
///     .label_service(CachedLabelService::new(MyLabels::new(endpoint)))
///     .config(TreeConfig::default().with_limit(Some(50)))
///     .build();
///
/// let forest = model
///     .load_children(&Node::ready_to_load_forest(), &OffsetPath::root(), CancellationToken::new())
///     .await?;
/// ```
#[derive(Clone)]
pub struct NodeModel {
    inner: Arc<NodeModelInner>,
}

struct NodeModelInner {
    service: Arc<dyn TreeQueryService>,
    labels: Option<Arc<dyn LabelService>>,
    config: TreeConfig,
}

impl NodeModel {
    /// Creates a new builder for constructing a model.
    pub fn builder() -> NodeModelBuilder<Missing> {
        NodeModelBuilder::new()
    }

    /// Creates a model with the default configuration and no label service.
    pub fn new<S: TreeQueryService + 'static>(service: S) -> Self {
        Self::builder().service(service).build()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.inner.config
    }

    /// Returns the tree query service.
    pub fn service(&self) -> &Arc<dyn TreeQueryService> {
        &self.inner.service
    }

    /// Starts loading the next page of children of the node at `path`.
    ///
    /// See [`query_more_children`].
    pub fn query_more_children(
        &self,
        forest: &KeyedForest<Node>,
        path: &OffsetPath,
        cancel: CancellationToken,
    ) -> Result<(KeyedForest<Node>, BoxFuture<'static, ChildrenPage>), ForestError> {
        query_more_children(
            forest,
            path,
            Arc::clone(&self.inner.service),
            self.inner.config.limit,
            cancel,
        )
    }

    /// Loads the next page of children of the node at `path` and applies it
    /// to `forest`.
    ///
    /// A failed request is recorded on the node rather than returned.
    pub async fn load_children(
        &self,
        forest: &KeyedForest<Node>,
        path: &OffsetPath,
        cancel: CancellationToken,
    ) -> Result<KeyedForest<Node>, ForestError> {
        let (loading, page) = self.query_more_children(forest, path, cancel)?;
        page.await.apply(&loading)
    }

    /// Restores the ancestor forest of `leafs`.
    ///
    /// See [`restore_forest_from_leafs`].
    pub async fn restore_forest_from_leafs(
        &self,
        leafs: &[Node],
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<Node>>, QueryError> {
        restore_forest_from_leafs(
            leafs,
            self.inner.service.as_ref(),
            cancel,
            self.inner.config.transitive_reduction,
        )
        .await
    }

    /// Returns the key of the first parent of `key`.
    ///
    /// See [`load_parent`].
    pub async fn load_parent(&self, key: &str) -> Result<String, QueryError> {
        load_parent(key, self.inner.service.as_ref()).await
    }

    /// Searches for `text` and restores the hits into a forest.
    ///
    /// Unless `force` is set, texts shorter than the configured minimum are
    /// rejected and the configured delay elapses before the query is sent,
    /// so that a search superseded while typing can be cancelled before it
    /// reaches the service.
    pub async fn search(
        &self,
        text: &str,
        force: bool,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome, QueryError> {
        let config = &self.inner.config;
        let text = text.trim();
        if text.is_empty() || (!force && !conforms_to_min_length(text, config.min_search_term_length)) {
            return Ok(SearchOutcome::TooShort);
        }

        if !force && !config.search_delay.is_zero() {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(SearchOutcome::Cancelled),
                _ = tokio::time::sleep(config.search_delay) => {}
            }
        }

        log::debug!("Searching for '{}'", text);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(SearchOutcome::Cancelled),
            result = self.inner.service.search(text, config.limit) => result?,
        };

        let matched_count = result.len();
        let mut leafs = leafs_from_search_result(&result);
        if !self.fill_labels(&mut leafs, cancel).await? {
            return Ok(SearchOutcome::Cancelled);
        }

        let Some(roots) = self.restore_forest_from_leafs(&leafs, cancel).await? else {
            return Ok(SearchOutcome::Cancelled);
        };

        let root = Node::root().with_children(roots).with_more_items(false);
        let forest = KeyedForest::create(Node::key_of, seal_lazy_expanding(&root));
        log::debug!("Search for '{}' matched {} items", text, matched_count);

        Ok(SearchOutcome::Found(SearchResult {
            forest,
            matched_count,
            match_limit: config.limit,
        }))
    }

    /// Restores a selection of `iris` together with their ancestors, e.g.
    /// to show a previously stored value.
    ///
    /// Every IRI becomes a terminal selection node. Returns `Ok(None)` if
    /// cancelled.
    pub async fn restore_selection(
        &self,
        iris: &[Iri],
        cancel: &CancellationToken,
    ) -> Result<Option<TreeSelection<Node>>, Error> {
        let mut leafs: Vec<Node> = iris.iter().cloned().map(Node::new).collect();
        if !self.fill_labels(&mut leafs, cancel).await? {
            return Ok(None);
        }

        let Some(roots) = self.restore_forest_from_leafs(&leafs, cancel).await? else {
            return Ok(None);
        };

        let root = Node::root().with_children(roots).with_more_items(false);
        let forest = KeyedForest::create(Node::key_of, root);
        Ok(Some(selection::from_forest(&forest)))
    }

    /// Resolves labels for nodes without one. Returns `false` if cancelled.
    async fn fill_labels(&self, nodes: &mut [Node], cancel: &CancellationToken) -> Result<bool, QueryError> {
        let Some(labels) = &self.inner.labels else {
            return Ok(true);
        };
        let missing: Vec<Iri> = nodes
            .iter()
            .filter(|node| node.label.is_none())
            .map(|node| node.iri.clone())
            .collect();
        if missing.is_empty() {
            return Ok(true);
        }

        let resolved = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(false),
            resolved = labels.labels(&missing) => resolved?,
        };

        for node in nodes.iter_mut().filter(|node| node.label.is_none()) {
            node.label = resolved.get(&node.iri).map(Literal::new);
        }
        Ok(true)
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`NodeModel`].
///
/// Uses the typestate pattern to ensure the tree query service is set at
/// compile time.
pub struct NodeModelBuilder<Service> {
    service: Service,
    labels: Option<Arc<dyn LabelService>>,
    config: TreeConfig,
}

impl NodeModelBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            service: Missing,
            labels: None,
            config: TreeConfig::default(),
        }
    }

    /// Sets the tree query service.
    pub fn service<S: TreeQueryService + 'static>(self, service: S) -> NodeModelBuilder<Set<Arc<dyn TreeQueryService>>> {
        self.shared_service(Arc::new(service))
    }

    /// Sets an already shared tree query service.
    pub fn shared_service(self, service: Arc<dyn TreeQueryService>) -> NodeModelBuilder<Set<Arc<dyn TreeQueryService>>> {
        NodeModelBuilder {
            service: Set(service),
            labels: self.labels,
            config: self.config,
        }
    }
}

impl Default for NodeModelBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> NodeModelBuilder<S> {
    /// Sets the service used to label restored nodes.
    pub fn label_service<L: LabelService + 'static>(mut self, labels: L) -> Self {
        self.labels = Some(Arc::new(labels));
        self
    }

    /// Sets the configuration.
    ///
    /// Defaults to [`TreeConfig::default`].
    pub fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }
}

impl NodeModelBuilder<Set<Arc<dyn TreeQueryService>>> {
    /// Builds the [`NodeModel`].
    pub fn build(self) -> NodeModel {
        NodeModel {
            inner: Arc::new(NodeModelInner {
                service: self.service.0,
                labels: self.labels,
                config: self.config,
            }),
        }
    }
}
