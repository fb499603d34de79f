//! Remote service contracts
//!
//! The tree never talks to an endpoint itself. Hosts implement
//! [`TreeQueryService`] (and optionally [`LabelService`]) on top of whatever
//! query language and transport they use; every call returns rows in the
//! select result shape described on each method.

mod page;

pub use page::*;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::QueryError;
use crate::model::Iri;
use crate::model::SelectResult;

/// Row variables produced by the tree queries.
pub mod vars {
    /// Item IRI.
    pub const ITEM: &str = "item";
    /// Item label literal.
    pub const LABEL: &str = "label";
    /// `"false"` when the item is known to have no children.
    pub const HAS_CHILDREN: &str = "hasChildren";
    /// Numeric relevance of a search hit.
    pub const SCORE: &str = "score";
    /// Parent IRI in parents rows.
    pub const PARENT: &str = "parent";
    /// Parent label literal in parents rows.
    pub const PARENT_LABEL: &str = "parentLabel";
}

/// The four query shapes a lazily loaded tree needs.
///
/// # Example
///
/// ```ignore
/// struct Skos { endpoint: MyEndpoint }
///
/// #[async_trait]
/// impl TreeQueryService for Skos {
///     async fn roots(&self, page: PageRequest) -> Result<SelectResult, QueryError> {
///         self.endpoint.select(TOP_CONCEPTS, page.offset, page.limit).await
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait TreeQueryService: Send + Sync {
    /// Top-level items; rows carry `item`, `label` and `hasChildren`.
    async fn roots(&self, page: PageRequest) -> Result<SelectResult, QueryError>;

    /// Children of `parent`; same row shape as [`roots`](Self::roots).
    async fn children(&self, parent: &Iri, page: PageRequest) -> Result<SelectResult, QueryError>;

    /// Parents of every item in the batch; rows carry `item`, `parent` and
    /// `parentLabel`. Items without parents produce no rows.
    async fn parents(&self, items: &[Iri]) -> Result<SelectResult, QueryError>;

    /// Items matching `token`; rows carry `item`, `label`, `score` and
    /// `hasChildren`. At most `limit` rows when a limit is given.
    async fn search(&self, token: &str, limit: Option<usize>) -> Result<SelectResult, QueryError>;
}

/// Resolves display labels for IRIs.
#[async_trait]
pub trait LabelService: Send + Sync {
    /// Returns labels for the IRIs it knows. Unknown IRIs are left out.
    async fn labels(&self, iris: &[Iri]) -> Result<HashMap<Iri, String>, QueryError>;
}
