//! Error types

mod forest;
mod query;

pub use forest::*;
pub use query::*;

/// Top-level error for operations that touch both the remote service and
/// the forest structure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote tree or label service failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A forest operation was given a path that does not address a node.
    #[error(transparent)]
    Forest(#[from] ForestError),
}
