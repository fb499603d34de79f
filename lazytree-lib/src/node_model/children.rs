//! Paged loading of children

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::api::PageRequest;
use crate::api::TreeQueryService;
use crate::api::vars;
use crate::error::ForestError;
use crate::error::QueryError;
use crate::forest::KeyPath;
use crate::forest::KeyedForest;
use crate::forest::OffsetPath;
use crate::model::BindingExt;
use crate::model::Node;
use crate::model::SelectResult;
use crate::model::Term;

/// The outcome of one page request, to be applied to whatever forest is
/// current when it arrives.
///
/// The target node is located again by its key path, so pages stay
/// applicable after unrelated parts of the forest changed. If the node has
/// disappeared in the meantime [`apply`](Self::apply) fails with
/// [`ForestError::InvalidPath`].
#[derive(Debug, Clone)]
#[must_use = "a page does nothing until applied to a forest"]
pub struct ChildrenPage {
    path: OffsetPath,
    key_path: KeyPath,
    outcome: PageOutcome,
}

#[derive(Debug, Clone)]
enum PageOutcome {
    /// No request was made.
    Skipped,
    /// The request was cancelled before its result arrived.
    Cancelled,
    Loaded { nodes: Vec<Node>, page: PageRequest },
    Failed(QueryError),
}

impl ChildrenPage {
    fn new(path: OffsetPath, key_path: KeyPath, outcome: PageOutcome) -> Self {
        Self {
            path,
            key_path,
            outcome,
        }
    }

    /// Returns `true` if applying this page changes nothing.
    pub fn is_identity(&self) -> bool {
        matches!(self.outcome, PageOutcome::Skipped)
    }

    /// Returns `true` if the request was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, PageOutcome::Cancelled)
    }

    /// Returns the error the request failed with.
    pub fn error(&self) -> Option<&QueryError> {
        match &self.outcome {
            PageOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Merges the fetched children into `forest`, or records the failure on
    /// the target node. Either way the node stops loading.
    ///
    /// A cancelled page discards its result and only clears the loading flag,
    /// so the node can be requested again.
    pub fn apply(&self, forest: &KeyedForest<Node>) -> Result<KeyedForest<Node>, ForestError> {
        if self.is_identity() {
            return Ok(forest.clone());
        }

        let target = match forest.from_key_path(&self.key_path) {
            Some(target) => target,
            None if self.is_cancelled() => return Ok(forest.clone()),
            None => return Err(ForestError::InvalidPath(self.path.clone())),
        };
        let path = forest.offset_path(target);

        match &self.outcome {
            PageOutcome::Loaded { nodes, page } => forest.update_node(&path, |target| {
                let initial = target.children.as_deref().unwrap_or(&[]);
                let children = merge_removing_duplicates(Node::key_of, initial, nodes.iter().cloned());
                let added = children.len() - initial.len();
                Node {
                    loading: false,
                    error: None,
                    has_more_items: added != 0 && page.is_full(nodes.len()),
                    children: Some(children.into()),
                    ..target.clone()
                }
            }),
            PageOutcome::Failed(e) => forest.update_node(&path, |target| Node {
                loading: false,
                error: Some(e.clone()),
                ..target.clone()
            }),
            PageOutcome::Cancelled => forest.update_node(&path, |target| Node {
                loading: false,
                ..target.clone()
            }),
            PageOutcome::Skipped => Ok(forest.clone()),
        }
    }
}

/// Starts loading the next page of children of the node at `path`.
///
/// Returns the forest with the node marked as loading, and a future
/// resolving to the [`ChildrenPage`] to apply once the service answered.
/// The page starts at the number of children already loaded. If the node is
/// already loading or stopped with an error nothing is requested and the
/// page is an identity.
///
/// # Example
///
/// ```ignore
/// let (loading, page) = query_more_children(&forest, &OffsetPath::root(), service, Some(50), cancel)?;
/// render(&loading);
/// let forest = page.await.apply(&current_forest)?;
/// ```
pub fn query_more_children<S>(
    forest: &KeyedForest<Node>,
    path: &OffsetPath,
    service: Arc<S>,
    limit: Option<usize>,
    cancel: CancellationToken,
) -> Result<(KeyedForest<Node>, BoxFuture<'static, ChildrenPage>), ForestError>
where
    S: TreeQueryService + ?Sized + 'static,
{
    let id = forest
        .from_offset_path(path)
        .ok_or_else(|| ForestError::InvalidPath(path.clone()))?;
    let node = forest.node(id);
    let key_path = forest.key_path(id);

    if node.loading || node.error.is_some() {
        let page = ChildrenPage::new(path.clone(), key_path, PageOutcome::Skipped);
        return Ok((forest.clone(), futures::future::ready(page).boxed()));
    }

    let loading = forest.update_node(path, |target| Node {
        loading: true,
        ..target.clone()
    })?;

    let page = PageRequest::new(node.loaded_count(), limit);
    let parent = (!forest.is_root(id)).then(|| node.iri.clone());
    let path = path.clone();

    let future = async move {
        log::debug!(
            "Requesting children of {} (offset {}, limit {:?})",
            key_path.last().map(String::as_str).unwrap_or_default(),
            page.offset,
            page.limit
        );

        let request = async {
            match &parent {
                Some(iri) => service.children(iri, page).await,
                None => service.roots(page).await,
            }
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => PageOutcome::Cancelled,
            result = request => match result {
                Ok(result) => PageOutcome::Loaded {
                    nodes: nodes_from_query_result(&result),
                    page,
                },
                Err(e) => {
                    log::warn!("Failed to load children: {}", e);
                    PageOutcome::Failed(e)
                }
            },
        };

        ChildrenPage::new(path, key_path, outcome)
    };

    Ok((loading, future.boxed()))
}

/// Appends the `new` nodes whose key is not among `old` (or earlier `new`
/// nodes), keeping order.
pub fn merge_removing_duplicates<T, F>(key_of: F, old: &[T], new: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> String,
{
    let mut seen: std::collections::HashSet<String> = old.iter().map(&key_of).collect();
    let mut merged = old.to_vec();
    merged.extend(new.into_iter().filter(|node| seen.insert(key_of(node))));
    merged
}

/// Converts roots or children rows into nodes.
///
/// Rows whose `item` is not an IRI are skipped. An item with
/// `hasChildren = "false"` is a confirmed leaf, everything else still has
/// children to load.
pub fn nodes_from_query_result(result: &SelectResult) -> Vec<Node> {
    result
        .bindings()
        .iter()
        .filter_map(|binding| {
            let iri = binding.iri(vars::ITEM)?;
            let certainly_leaf = binding.get(vars::HAS_CHILDREN).map(Term::value) == Some("false");

            let mut node = Node::new(iri.clone());
            node.label = binding.literal(vars::LABEL).cloned();
            node.score = binding.literal(vars::SCORE).and_then(|score| score.as_f64());
            if certainly_leaf {
                node = node.with_children(Vec::new()).with_more_items(false);
            }
            Some(node)
        })
        .collect()
}
