//! Remote query error types

use std::time::Duration;

/// Errors reported by a [`TreeQueryService`](crate::api::TreeQueryService)
/// or [`LabelService`](crate::api::LabelService).
///
/// The type is `Clone` so that a tree node can keep the error which stopped
/// its children from loading until a fresh request replaces it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Service {
        /// HTTP status code.
        status: u16,
        /// Error message returned by the endpoint.
        message: String,
    },

    /// The request never reached the endpoint or the connection dropped.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// Failed to parse the result set.
    #[error("Result parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// A row that the caller cannot do without had an unexpected shape.
    #[error("Malformed result row: {0}")]
    MalformedRow(String),
}

impl QueryError {
    /// Creates a new service error.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
        }
    }

    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is a service error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(error.to_string())
    }
}
