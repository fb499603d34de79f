//! In-memory label store using DashMap

use dashmap::DashMap;

use crate::model::Iri;

use super::CachedLabel;

/// An in-memory label cache backed by a concurrent hash map.
///
/// Expired entries are never returned and are dropped lazily on access or
/// eagerly by [`gc`](Self::gc).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazytree_lib::cache::{CachedLabel, LabelCache};
/// use lazytree_lib::model::Iri;
///
/// let cache = LabelCache::new();
/// let iri = Iri::new("http://example.com/a");
/// cache.set(iri.clone(), CachedLabel::with_ttl(Some("A".into()), Duration::from_secs(60)));
/// assert_eq!(cache.get(&iri).unwrap().label.as_deref(), Some("A"));
/// ```
#[derive(Debug, Default)]
pub struct LabelCache {
    store: DashMap<Iri, CachedLabel>,
}

impl LabelCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the entry for `iri` unless it is missing or expired.
    pub fn get(&self, iri: &Iri) -> Option<CachedLabel> {
        let entry = self.store.get(iri)?;
        let value = entry.value();

        if value.is_expired() {
            drop(entry);
            self.store.remove(iri);
            None
        } else {
            Some(value.clone())
        }
    }

    /// Stores an entry, replacing any previous one.
    pub fn set(&self, iri: Iri, value: CachedLabel) {
        self.store.insert(iri, value);
    }

    pub fn remove(&self, iri: &Iri) {
        self.store.remove(iri);
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    /// Removes all expired entries and returns how many were removed.
    pub fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, value| {
            if value.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_expired_entries_are_hidden() {
        let cache = LabelCache::new();
        let iri = Iri::new("http://example.com/a");
        cache.set(iri.clone(), CachedLabel::with_ttl(Some("A".into()), Duration::ZERO));

        assert!(cache.get(&iri).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_gc() {
        let cache = LabelCache::new();
        cache.set(
            Iri::new("http://example.com/a"),
            CachedLabel::with_ttl(None, Duration::ZERO),
        );
        cache.set(
            Iri::new("http://example.com/b"),
            CachedLabel::with_ttl(None, Duration::from_secs(60)),
        );

        assert_eq!(cache.gc(), 1);
        assert_eq!(cache.len(), 1);
    }
}
