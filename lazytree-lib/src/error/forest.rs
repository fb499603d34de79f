//! Forest structure error types

use crate::forest::OffsetPath;

/// Errors raised when a forest is addressed with a path that does not
/// resolve to a node.
///
/// These indicate programmer misuse (for example a path captured against an
/// older forest version), never a data problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForestError {
    /// An empty offset path was passed to an update operation.
    #[error("Cannot update node at an empty path")]
    EmptyPath,

    /// The path points past the end of a children list or below a node
    /// whose children are not loaded.
    #[error("Path {0} does not address a node in this forest")]
    InvalidPath(OffsetPath),
}
