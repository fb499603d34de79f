//! Cache configuration

use std::time::Duration;

/// Configuration for label cache TTL (time-to-live) settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazytree_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_label_ttl(Duration::from_secs(600));
/// assert_eq!(config.label_ttl, Duration::from_secs(600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for resolved labels, including "no label" answers.
    ///
    /// Default: 1 hour
    pub label_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            label_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl CacheConfig {
    /// Creates a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label TTL.
    pub fn with_label_ttl(mut self, ttl: Duration) -> Self {
        self.label_ttl = ttl;
        self
    }

    /// Creates a config with no caching (zero TTL).
    pub fn no_cache() -> Self {
        Self {
            label_ttl: Duration::ZERO,
        }
    }

    /// Returns `true` if nothing should be stored.
    pub fn is_disabled(&self) -> bool {
        self.label_ttl.is_zero()
    }
}
