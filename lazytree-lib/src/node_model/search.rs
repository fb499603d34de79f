//! Search results and restored selections

use crate::api::vars;
use crate::forest::KeyedForest;
use crate::model::BindingExt;
use crate::model::Node;
use crate::model::SelectResult;
use crate::model::Term;

/// What a search produced.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The text is shorter than the configured minimum and was not sent.
    TooShort,
    /// The search was cancelled, e.g. superseded by a newer one.
    Cancelled,
    /// Hits restored into their ancestor forest.
    Found(SearchResult),
}

impl SearchOutcome {
    /// Returns the result if the search completed.
    pub fn found(self) -> Option<SearchResult> {
        match self {
            Self::Found(result) => Some(result),
            _ => None,
        }
    }
}

/// A completed search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Hits and their ancestors, sorted by relevance.
    pub forest: KeyedForest<Node>,
    /// Number of rows the search returned.
    pub matched_count: usize,
    /// Row limit the search ran with.
    pub match_limit: Option<usize>,
}

impl SearchResult {
    /// Returns `true` if the row limit was hit, so more matches may exist.
    pub fn reached_limit(&self) -> bool {
        self.match_limit.is_some_and(|limit| self.matched_count >= limit)
    }

    /// Returns `true` if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }
}

/// Converts search rows into leaf nodes for restoration.
///
/// Missing or unparsable scores count as zero. Hits not known to be leafs
/// keep their children unloaded.
pub(crate) fn leafs_from_search_result(result: &SelectResult) -> Vec<Node> {
    result
        .bindings()
        .iter()
        .filter_map(|binding| {
            let iri = binding.iri(vars::ITEM)?;
            let certainly_leaf = binding.get(vars::HAS_CHILDREN).map(Term::value) == Some("false");
            let score = binding
                .literal(vars::SCORE)
                .and_then(|score| score.as_f64())
                .unwrap_or(0.0);

            let mut node = Node::new(iri.clone())
                .with_score(score)
                .with_more_items(!certainly_leaf);
            node.label = binding.literal(vars::LABEL).cloned();
            Some(node)
        })
        .collect()
}

/// Returns `true` if `text` may be searched for without forcing.
pub(crate) fn conforms_to_min_length(text: &str, min_length: usize) -> bool {
    text.trim().chars().count() >= min_length
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_leafs_from_search_result() {
        let mut hit = HashMap::new();
        hit.insert(vars::ITEM.to_string(), Term::iri("http://example.com/a"));
        hit.insert(vars::SCORE.to_string(), Term::literal("2.5"));
        hit.insert(vars::HAS_CHILDREN.to_string(), Term::literal("false"));

        let mut unscored = HashMap::new();
        unscored.insert(vars::ITEM.to_string(), Term::iri("http://example.com/b"));

        let leafs = leafs_from_search_result(&SelectResult::from_bindings(vec![hit, unscored]));
        assert_eq!(leafs[0].score, Some(2.5));
        assert!(!leafs[0].has_more_items);
        assert_eq!(leafs[1].score, Some(0.0));
        assert!(leafs[1].has_more_items);
    }

    #[test]
    fn test_min_length_counts_chars() {
        assert!(conforms_to_min_length("äöü", 3));
        assert!(!conforms_to_min_length("  ab ", 3));
    }
}
