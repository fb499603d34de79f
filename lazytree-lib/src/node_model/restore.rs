//! Rebuilding forests from leaf nodes

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::HashMap;

use tokio_util::sync::CancellationToken;

use crate::api::TreeQueryService;
use crate::api::vars;
use crate::error::QueryError;
use crate::forest::map_bottom_up;
use crate::graph::Graph;
use crate::graph::GraphIndex;
use crate::graph::break_graph_cycles;
use crate::graph::find_roots;
use crate::graph::transitive_reduction;
use crate::model::BindingExt;
use crate::model::Iri;
use crate::model::Literal;
use crate::model::Node;

/// A node while the ancestor graph is being resolved.
#[derive(Debug, Clone)]
struct PendingNode {
    iri: Iri,
    label: Option<Literal>,
    score: Option<f64>,
    has_more_items: bool,
}

/// Restores the ancestor forest above `leafs`.
///
/// Parents are requested in rounds: each round is a single batched parents
/// query over every node whose parents are still unknown, and the next round
/// only starts once the previous answer is merged. The resulting graph may
/// contain cycles and shortcut edges; cycles are always broken and shortcuts
/// are removed when `reduce` is set. A concept reached through several
/// parents appears under each of them.
///
/// Returns the top-level nodes, sorted by descending score (the sum of the
/// node's own score and its children's) then by label. Returns `Ok(None)` if
/// `cancel` fires before restoration finished.
pub async fn restore_forest_from_leafs<S>(
    leafs: &[Node],
    service: &S,
    cancel: &CancellationToken,
    reduce: bool,
) -> Result<Option<Vec<Node>>, QueryError>
where
    S: TreeQueryService + ?Sized,
{
    let mut graph = Graph::new();
    let mut index: HashMap<String, GraphIndex> = HashMap::new();

    for leaf in leafs {
        let key = Node::key_of(leaf);
        if index.contains_key(&key) {
            continue;
        }
        let id = graph.add_node(PendingNode {
            iri: leaf.iri.clone(),
            label: leaf.label.clone(),
            score: leaf.score,
            has_more_items: leaf.has_more_items,
        });
        index.insert(key, id);
    }

    if graph.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let mut unresolved: BTreeSet<GraphIndex> = (0..graph.len()).collect();
    let mut round = 0;

    while !unresolved.is_empty() {
        round += 1;
        let requested: Vec<GraphIndex> = unresolved.iter().copied().collect();
        let items: Vec<Iri> = requested.iter().map(|&i| graph.node(i).iri.clone()).collect();
        log::debug!("Resolving parents of {} nodes (round {})", items.len(), round);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(None),
            result = service.parents(&items) => result.inspect_err(|e| {
                log::warn!("Failed to resolve parents: {}", e);
            })?,
        };

        for binding in result.bindings() {
            let (Some(item), Some(parent)) = (binding.iri(vars::ITEM), binding.iri(vars::PARENT)) else {
                continue;
            };
            let Some(&child) = index.get(item.as_str()) else {
                continue;
            };
            unresolved.remove(&child);

            match index.get(parent.as_str()) {
                Some(&existing) => {
                    graph.add_edge(existing, child);
                }
                None => {
                    let id = graph.add_node(PendingNode {
                        iri: parent.clone(),
                        label: binding.literal(vars::PARENT_LABEL).cloned(),
                        score: None,
                        has_more_items: false,
                    });
                    index.insert(parent.as_str().to_string(), id);
                    graph.add_edge(id, child);
                    unresolved.insert(id);
                }
            }
        }

        for i in requested {
            unresolved.remove(&i);
        }
    }

    let removed = break_graph_cycles(&mut graph);
    if !removed.is_empty() {
        log::debug!("Broke {} cycles in restored hierarchy", removed.len());
    }
    if reduce {
        transitive_reduction(&mut graph);
    }

    let roots = find_roots(&graph);
    Ok(Some(as_immutable_forest(&graph, &roots)))
}

fn as_immutable_forest(graph: &Graph<PendingNode>, indices: &[GraphIndex]) -> Vec<Node> {
    let mut nodes: Vec<Node> = indices
        .iter()
        .map(|&i| {
            let pending = graph.node(i);
            let children = as_immutable_forest(graph, graph.children(i));
            let total: f64 = children.iter().filter_map(|child| child.score).sum();
            let has_more_items = pending.has_more_items && children.is_empty();

            Node {
                iri: pending.iri.clone(),
                label: pending.label.clone(),
                children: (!has_more_items).then(|| children.into()),
                expanded: !has_more_items,
                loading: false,
                error: None,
                has_more_items,
                score: Some(total + pending.score.unwrap_or(0.0)),
            }
        })
        .collect();
    nodes.sort_by(compare_by_score_then_label);
    nodes
}

fn compare_by_score_then_label(a: &Node, b: &Node) -> Ordering {
    let score_a = a.score.unwrap_or(0.0);
    let score_b = b.score.unwrap_or(0.0);
    score_b
        .total_cmp(&score_a)
        .then_with(|| a.label_text().cmp(b.label_text()))
}

/// Marks every node with at least one child as fully loaded, and every fully
/// loaded node as expanded.
pub fn seal_lazy_expanding(root: &Node) -> Node {
    map_bottom_up(root, &mut |node: Node| {
        let has_more_items = node.has_more_items && node.loaded_count() == 0;
        Node {
            expanded: node.expanded || !has_more_items,
            has_more_items,
            ..node
        }
    })
}

/// Returns the key of the first parent of `key`, or [`Node::ROOT_KEY`] if it
/// has none.
pub async fn load_parent<S>(key: &str, service: &S) -> Result<String, QueryError>
where
    S: TreeQueryService + ?Sized,
{
    let result = service.parents(&[Iri::new(key)]).await?;
    for binding in result.bindings() {
        if binding.iri(vars::ITEM).map(Iri::as_str) != Some(key) {
            continue;
        }
        return match binding.iri(vars::PARENT) {
            Some(parent) => Ok(parent.as_str().to_string()),
            None => Err(QueryError::MalformedRow(format!(
                "parents row for {} has no '{}' IRI",
                key,
                vars::PARENT
            ))),
        };
    }
    Ok(Node::ROOT_KEY.to_string())
}
