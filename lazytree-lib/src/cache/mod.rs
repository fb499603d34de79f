//! Label caching
//!
//! Resolving labels for restored selections and search hits is repeated
//! for the same IRIs over and over. [`CachedLabelService`] puts a TTL cache
//! in front of any [`LabelService`](crate::api::LabelService).

mod config;
mod memory;
mod service;

pub use config::*;
pub use memory::*;
pub use service::*;

use chrono::DateTime;
use chrono::Utc;

/// A cached label with metadata about when it was cached and when it expires.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedLabel {
    /// The label, or `None` if the service knew none.
    pub label: Option<String>,
    /// When this entry was cached.
    pub created_at: DateTime<Utc>,
    /// When this entry expires and should no longer be returned.
    pub expires_at: DateTime<Utc>,
}

impl CachedLabel {
    /// Creates a new cached label.
    pub fn new(label: Option<String>, created_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            label,
            created_at,
            expires_at,
        }
    }

    /// Creates a new cached label with a TTL from now.
    pub fn with_ttl(label: Option<String>, ttl: std::time::Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        Self {
            label,
            created_at: now,
            expires_at,
        }
    }

    /// Returns `true` if this entry has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
