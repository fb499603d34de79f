//! Caching decorator for label services

use std::collections::HashMap;

use async_trait::async_trait;

use crate::api::LabelService;
use crate::error::QueryError;
use crate::model::Iri;

use super::CacheConfig;
use super::CachedLabel;
use super::LabelCache;

/// A [`LabelService`] that answers from a [`LabelCache`] and forwards only
/// the IRIs it has no fresh entry for.
///
/// IRIs the inner service has no label for are cached as such, so they are
/// not asked for again until the entry expires.
pub struct CachedLabelService<S> {
    inner: S,
    cache: LabelCache,
    config: CacheConfig,
}

impl<S: LabelService> CachedLabelService<S> {
    /// Wraps `inner` with the default cache configuration.
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, CacheConfig::default())
    }

    /// Wraps `inner` with the given cache configuration.
    pub fn with_config(inner: S, config: CacheConfig) -> Self {
        Self {
            inner,
            cache: LabelCache::new(),
            config,
        }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &LabelCache {
        &self.cache
    }

    /// Returns the wrapped service.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: LabelService> LabelService for CachedLabelService<S> {
    async fn labels(&self, iris: &[Iri]) -> Result<HashMap<Iri, String>, QueryError> {
        let mut labels = HashMap::new();
        let mut missing = Vec::new();

        for iri in iris {
            match self.cache.get(iri) {
                Some(cached) => {
                    if let Some(label) = cached.label {
                        labels.insert(iri.clone(), label);
                    }
                }
                None if !missing.contains(iri) => missing.push(iri.clone()),
                None => {}
            }
        }

        if missing.is_empty() {
            log::trace!("All {} labels served from cache", iris.len());
            return Ok(labels);
        }

        log::debug!("Fetching {} of {} labels", missing.len(), iris.len());
        let fetched = self.inner.labels(&missing).await?;

        if !self.config.is_disabled() {
            for iri in &missing {
                let label = fetched.get(iri).cloned();
                self.cache.set(iri.clone(), CachedLabel::with_ttl(label, self.config.label_ttl));
            }
        }

        labels.extend(fetched);
        Ok(labels)
    }
}
