//! Cache-aware fetching.
//!
//! Layers a `CacheStore` over an arbitrary async producer under one of two
//! read policies, and offers the invalidation helpers callers use after a
//! known mutation.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheKey, CacheStore, EventStatus};

// == Fetch Policy ==
/// How `CachedFetcher::fetch` reads through the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve an unexpired entry and refresh it in the background.
    /// Expired entries are dropped and the producer is awaited.
    #[default]
    CacheFirst,
    /// Serve any entry, expired or not, and always refresh in the background.
    StaleWhileRevalidate,
}

impl FromStr for FetchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cache-first" => Ok(FetchPolicy::CacheFirst),
            "stale-while-revalidate" => Ok(FetchPolicy::StaleWhileRevalidate),
            other => Err(format!("Unknown fetch policy: {}", other)),
        }
    }
}

impl fmt::Display for FetchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPolicy::CacheFirst => f.write_str("cache-first"),
            FetchPolicy::StaleWhileRevalidate => f.write_str("stale-while-revalidate"),
        }
    }
}

// == Cached Fetcher ==
/// Entry point for every cached data read.
///
/// Producers are zero-argument closures returning a future. The only error a
/// caller ever sees is the producer's own, and only when no cached value can
/// stand in for it.
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    store: Arc<CacheStore>,
    policy: FetchPolicy,
}

impl CachedFetcher {
    /// Creates a fetcher using the cache-first policy by default.
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self::with_policy(store, FetchPolicy::default())
    }

    pub fn with_policy(store: Arc<CacheStore>, policy: FetchPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    // == Fetch ==
    /// Reads `key` through the cache using this fetcher's default policy.
    pub async fn fetch<T, E, F, Fut>(
        &self,
        key: impl Into<String>,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        match self.policy {
            FetchPolicy::CacheFirst => self.fetch_with_cache(key, producer, ttl).await,
            FetchPolicy::StaleWhileRevalidate => {
                self.fetch_with_stale_revalidate(key, producer, ttl).await
            }
        }
    }

    // == Cache First ==
    /// Returns an unexpired cached value immediately and refreshes it in a
    /// detached task. On a miss, awaits the producer, caches the result, and
    /// returns it; a producer error is returned as is.
    ///
    /// The freshness check removes an expired record before the producer runs.
    pub async fn fetch_with_cache<T, E, F, Fut>(
        &self,
        key: impl Into<String>,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let key = key.into();

        if let Some(cached) = self.store.get::<T>(&key).await {
            debug!("Cache hit for {}, refreshing in background", key);
            self.spawn_refresh(key, producer(), ttl);
            return Ok(cached);
        }

        debug!("Cache miss for {}, fetching", key);
        let data = producer().await?;
        self.store.set(&key, &data, ttl).await;
        Ok(data)
    }

    // == Stale While Revalidate ==
    /// Always runs the producer. If any cached value exists, expired or not,
    /// it is returned immediately while the producer finishes in a detached
    /// task. Otherwise the producer is awaited and its error returned as is.
    ///
    /// This path never removes a record.
    pub async fn fetch_with_stale_revalidate<T, E, F, Fut>(
        &self,
        key: impl Into<String>,
        producer: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
        E: fmt::Display + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let key = key.into();
        let stale = self.store.get_stale::<T>(&key).await;
        let fresh = producer();

        match stale {
            Some(stale) => {
                debug!("Serving cached value for {} while revalidating", key);
                self.spawn_refresh(key, fresh, ttl);
                Ok(stale)
            }
            None => {
                debug!("No cached value for {}, awaiting producer", key);
                let data = fresh.await?;
                self.store.set(&key, &data, ttl).await;
                Ok(data)
            }
        }
    }

    /// Drives `fresh` to completion in a detached task and caches its result.
    /// Failures are logged and dropped.
    fn spawn_refresh<T, E, Fut>(&self, key: String, fresh: Fut, ttl: Option<Duration>)
    where
        T: Serialize + Send + Sync + 'static,
        E: fmt::Display + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match fresh.await {
                Ok(data) => {
                    store.set(&key, &data, ttl).await;
                    debug!("Background refresh stored {}", key);
                }
                Err(err) => {
                    debug!("Background refresh for {} failed: {}", key, err);
                }
            }
        });
    }

    // == Invalidation ==
    /// Removes the cached value for `key`.
    pub async fn invalidate_cache(&self, key: &str) {
        self.store.clear(key).await;
    }

    /// Removes every cached value derived from event data: the per-event
    /// detail, prizes, and participants (when `event_id` is given), every
    /// event list filter, and the hero and stats aggregates.
    ///
    /// Returns the keys that were cleared.
    pub async fn invalidate_event_caches(&self, event_id: Option<&str>) -> Vec<CacheKey> {
        let mut keys = Vec::new();

        if let Some(id) = event_id {
            keys.push(CacheKey::event(id));
            keys.push(CacheKey::event_prizes(id));
            keys.push(CacheKey::event_participants(id));
        }

        keys.push(CacheKey::events(None));
        keys.extend(EventStatus::ALL.into_iter().map(|s| CacheKey::events(Some(s))));
        keys.push(CacheKey::hero_events());
        keys.push(CacheKey::stats());

        for key in &keys {
            self.store.clear(key.as_str()).await;
        }

        debug!("Invalidated {} event cache keys", keys.len());
        keys
    }
}
