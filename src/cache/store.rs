//! Cache Store Module
//!
//! Namespaced, expiring cache records on top of a shared storage backend.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::entry::{current_timestamp_ms, EntryHeader};
use crate::cache::{
    CacheEntry, CacheStats, CacheTtl, MemoryStorage, StorageBackend, DEFAULT_PREFIX,
};
use crate::error::StorageError;

// == Cache Store ==
/// Typed cache over a storage backend.
///
/// Every record lives under `prefix + key`. Keys outside the prefix belong
/// to someone else and are never read or removed. A store without a backend
/// behaves as a permanent miss.
pub struct CacheStore {
    /// Underlying key-value storage, None = unavailable
    backend: Option<Arc<dyn StorageBackend>>,
    /// Private namespace prefix
    prefix: String,
    /// TTL used when a write does not specify one
    default_ttl: Duration,
    /// Performance statistics
    stats: Mutex<CacheStats>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("available", &self.backend.is_some())
            .field("prefix", &self.prefix)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl CacheStore {
    // == Constructors ==
    /// Creates a store over `backend` using the given namespace and default TTL.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        prefix: impl Into<String>,
        default_ttl: Duration,
    ) -> Self {
        Self {
            backend: Some(backend),
            prefix: prefix.into(),
            default_ttl,
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Creates a store with no durable storage. Reads miss, writes are dropped.
    pub fn unavailable(prefix: impl Into<String>, default_ttl: Duration) -> Self {
        Self {
            backend: None,
            prefix: prefix.into(),
            default_ttl,
            stats: Mutex::new(CacheStats::new()),
        }
    }

    /// Creates an unbounded in-memory store with the default namespace and TTL.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStorage::new()),
            DEFAULT_PREFIX,
            CacheTtl::default().as_duration(),
        )
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Reads the raw record for `key`. Backend failures read as absent.
    async fn read_raw(&self, backend: &dyn StorageBackend, storage_key: &str) -> Option<String> {
        match backend.get_item(storage_key).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Cache read error for {}: {}", storage_key, err);
                None
            }
        }
    }

    // == Get ==
    /// Returns the payload for `key` if it exists and has not expired.
    ///
    /// An expired record is removed. A record that cannot be parsed, or whose
    /// payload does not deserialize as `T`, reads as absent and is left alone.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_deref()?;
        let storage_key = self.storage_key(key);

        let Some(raw) = self.read_raw(backend, &storage_key).await else {
            self.stats.lock().await.record_miss();
            return None;
        };

        let entry: CacheEntry<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                debug!("Unreadable cache record for {}: {}", key, err);
                self.stats.lock().await.record_miss();
                return None;
            }
        };

        if entry.is_expired() {
            debug!("Cache entry expired: {}", key);
            if let Err(err) = backend.remove_item(&storage_key).await {
                warn!("Failed to remove expired cache entry {}: {}", key, err);
            }
            let mut stats = self.stats.lock().await;
            stats.record_evictions(1);
            stats.record_miss();
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => {
                self.stats.lock().await.record_hit();
                Some(data)
            }
            Err(err) => {
                debug!("Cached payload for {} has unexpected shape: {}", key, err);
                self.stats.lock().await.record_miss();
                None
            }
        }
    }

    // == Get Stale ==
    /// Returns the payload for `key` regardless of expiry. Never removes.
    pub async fn get_stale<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let backend = self.backend.as_deref()?;
        let storage_key = self.storage_key(key);

        let entry: Option<CacheEntry<T>> = self
            .read_raw(backend, &storage_key)
            .await
            .and_then(|raw| serde_json::from_str(&raw).ok());

        let mut stats = self.stats.lock().await;
        match entry {
            Some(entry) => {
                if entry.is_expired() {
                    stats.record_stale_hit();
                } else {
                    stats.record_hit();
                }
                Some(entry.data)
            }
            None => {
                stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the full record for `key` without checking expiry or payload
    /// shape. Does not touch statistics.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry<serde_json::Value>> {
        let backend = self.backend.as_deref()?;
        let raw = self.read_raw(backend, &self.storage_key(key)).await?;
        serde_json::from_str(&raw).ok()
    }

    // == Is Valid ==
    /// Returns true if an unexpired record exists for `key`. Never mutates.
    pub async fn is_valid(&self, key: &str) -> bool {
        let Some(backend) = self.backend.as_deref() else {
            return false;
        };

        self.read_raw(backend, &self.storage_key(key))
            .await
            .and_then(|raw| serde_json::from_str::<EntryHeader>(&raw).ok())
            .map(|header| {
                let now = current_timestamp_ms();
                now <= header.expires_at
            })
            .unwrap_or(false)
    }

    // == Set ==
    /// Stores `data` under `key` for `ttl` (or the default TTL).
    ///
    /// On a quota failure, expired entries across the namespace are evicted
    /// once and the write is retried once. Any remaining failure is logged
    /// and dropped. Returns whether the record was written.
    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        data: &T,
        ttl: Option<Duration>,
    ) -> bool {
        let Some(backend) = self.backend.as_deref() else {
            return false;
        };
        let ttl = ttl.unwrap_or(self.default_ttl);
        let storage_key = self.storage_key(key);

        let record = match serde_json::to_string(&CacheEntry::new(data, ttl)) {
            Ok(record) => record,
            Err(err) => {
                warn!("Cache write error for {}: {}", key, err);
                self.stats.lock().await.record_write_failure();
                return false;
            }
        };

        match backend.set_item(&storage_key, &record).await {
            Ok(()) => true,
            Err(StorageError::QuotaExceeded { used, quota }) => {
                debug!(
                    "Cache write for {} exceeds quota ({} of {} bytes), evicting expired entries",
                    key, used, quota
                );
                self.stats.lock().await.record_quota_recovery();
                self.evict_expired().await;

                // Re-stamp so the retried entry gets its full TTL
                let retried = serde_json::to_string(&CacheEntry::new(data, ttl))
                    .map_err(StorageError::from);
                let result = match retried {
                    Ok(record) => backend.set_item(&storage_key, &record).await,
                    Err(err) => Err(err),
                };

                match result {
                    Ok(()) => true,
                    Err(err) => {
                        warn!("Cache write error after cleanup for {}: {}", key, err);
                        self.stats.lock().await.record_write_failure();
                        false
                    }
                }
            }
            Err(err) => {
                warn!("Cache write error for {}: {}", key, err);
                self.stats.lock().await.record_write_failure();
                false
            }
        }
    }

    // == Clear ==
    /// Removes the record for `key`, expired or not.
    pub async fn clear(&self, key: &str) {
        let Some(backend) = self.backend.as_deref() else {
            return;
        };
        if let Err(err) = backend.remove_item(&self.storage_key(key)).await {
            warn!("Failed to clear cache entry {}: {}", key, err);
        }
    }

    /// Lists the backend keys that belong to this namespace.
    async fn namespaced_keys(&self, backend: &dyn StorageBackend) -> Vec<String> {
        match backend.keys().await {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.prefix))
                .collect(),
            Err(err) => {
                warn!("Failed to list cache keys: {}", err);
                Vec::new()
            }
        }
    }

    // == Clear All ==
    /// Removes every record in the namespace. Returns the number removed.
    pub async fn clear_all(&self) -> usize {
        let Some(backend) = self.backend.as_deref() else {
            return 0;
        };

        let mut removed = 0;
        for storage_key in self.namespaced_keys(backend).await {
            match backend.remove_item(&storage_key).await {
                Ok(()) => removed += 1,
                Err(err) => warn!("Failed to clear cache entry {}: {}", storage_key, err),
            }
        }

        info!("Cleared {} cache entries", removed);
        removed
    }

    // == Evict Expired ==
    /// Sweeps the namespace once, removing expired and unparseable records.
    ///
    /// Returns the number of entries removed.
    pub async fn evict_expired(&self) -> usize {
        let Some(backend) = self.backend.as_deref() else {
            return 0;
        };

        let now = current_timestamp_ms();
        let mut removed = 0;

        for storage_key in self.namespaced_keys(backend).await {
            let Some(raw) = self.read_raw(backend, &storage_key).await else {
                continue;
            };

            let stale = match serde_json::from_str::<EntryHeader>(&raw) {
                Ok(header) => now > header.expires_at,
                Err(_) => true,
            };
            if !stale {
                continue;
            }

            match backend.remove_item(&storage_key).await {
                Ok(()) => removed += 1,
                Err(err) => warn!("Failed to evict cache entry {}: {}", storage_key, err),
            }
        }

        if removed > 0 {
            info!("Cleared {} expired cache entries", removed);
        } else {
            debug!("No expired cache entries found");
        }

        self.stats.lock().await.record_evictions(removed);
        removed
    }

    // == Length ==
    /// Returns the number of records in the namespace, expired ones included.
    pub async fn len(&self) -> usize {
        match self.backend.as_deref() {
            Some(backend) => self.namespaced_keys(backend).await.len(),
            None => 0,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.len().await;
        let mut stats = self.stats.lock().await.clone();
        stats.set_total_entries(total_entries);
        stats
    }
}
