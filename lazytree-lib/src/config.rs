//! Tree configuration

use std::time::Duration;

use serde::Deserialize;

/// Settings shared by every operation of a [`NodeModel`](crate::node_model::NodeModel).
///
/// Hosts usually build it in code, but it can also be read from a JSON
/// component configuration; missing keys keep their defaults and the search
/// delay is given in milliseconds.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazytree_lib::config::TreeConfig;
///
/// let config: TreeConfig = serde_json::from_str(r#"{ "limit": 50, "searchDelay": 100 }"#).unwrap();
/// assert_eq!(config.limit, Some(50));
/// assert_eq!(config.search_delay, Duration::from_millis(100));
/// assert_eq!(config.min_search_term_length, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    /// Page size for root and children queries, and maximum number of search
    /// hits. `None` fetches everything at once.
    ///
    /// Default: 200
    pub limit: Option<usize>,

    /// Shortest search text that is sent without being forced.
    ///
    /// Default: 3
    pub min_search_term_length: usize,

    /// Debounce delay before a search is issued.
    ///
    /// Default: 300 ms
    #[serde(deserialize_with = "deserialize_millis")]
    pub search_delay: Duration,

    /// Whether restored forests drop edges implied by longer paths.
    ///
    /// Default: true
    pub transitive_reduction: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            limit: Some(200),
            min_search_term_length: 3,
            search_delay: Duration::from_millis(300),
            transitive_reduction: true,
        }
    }
}

impl TreeConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the minimal search text length.
    pub fn with_min_search_term_length(mut self, length: usize) -> Self {
        self.min_search_term_length = length;
        self
    }

    /// Sets the search debounce delay.
    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    /// Enables or disables transitive reduction of restored forests.
    pub fn with_transitive_reduction(mut self, enabled: bool) -> Self {
        self.transitive_reduction = enabled;
        self
    }
}

fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
