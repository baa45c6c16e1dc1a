//! Configuration Module
//!
//! Handles loading and managing configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{
    CacheStore, FileStorage, MemoryStorage, DEFAULT_PREFIX, DEFAULT_QUOTA_BYTES,
};
use crate::error::Result;
use crate::fetch::FetchPolicy;

// == Storage Kind ==
/// Which storage backend the cache sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Process memory, lost on restart
    Memory,
    /// JSON snapshot on disk
    File,
    /// No storage; every read misses
    None,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            "none" => Ok(StorageKind::None),
            other => Err(format!("Unknown storage backend: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace prefix for cache records
    pub cache_prefix: String,
    /// Default TTL in seconds for writes without explicit TTL
    pub default_ttl: u64,
    /// Storage backend kind
    pub storage_backend: StorageKind,
    /// Snapshot path for the file backend
    pub storage_path: PathBuf,
    /// Storage quota in bytes
    pub storage_quota: usize,
    /// Policy used by `CachedFetcher::fetch`
    pub fetch_policy: FetchPolicy,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds, 0 = disabled
    pub cleanup_interval: u64,
}

/// Reads and parses `name`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_PREFIX` - Record namespace (default: luckydraw_cache_)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `STORAGE_BACKEND` - memory, file, or none (default: memory)
    /// - `STORAGE_PATH` - File backend snapshot (default: luckydraw_cache.json)
    /// - `STORAGE_QUOTA_BYTES` - Storage quota (default: 5 MiB)
    /// - `FETCH_POLICY` - cache-first or stale-while-revalidate (default: cache-first)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            cache_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            storage_backend: env_or("STORAGE_BACKEND", defaults.storage_backend),
            storage_path: env::var("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            storage_quota: env_or("STORAGE_QUOTA_BYTES", defaults.storage_quota),
            fetch_policy: env_or("FETCH_POLICY", defaults.fetch_policy),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    pub fn default_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    // == Build Store ==
    /// Opens the configured storage backend and wraps it in a `CacheStore`.
    pub async fn build_store(&self) -> Result<CacheStore> {
        let ttl = self.default_ttl_duration();

        let store = match self.storage_backend {
            StorageKind::Memory => CacheStore::new(
                Arc::new(MemoryStorage::with_quota(self.storage_quota)),
                self.cache_prefix.clone(),
                ttl,
            ),
            StorageKind::File => {
                let storage = FileStorage::open(&self.storage_path, Some(self.storage_quota)).await?;
                CacheStore::new(Arc::new(storage), self.cache_prefix.clone(), ttl)
            }
            StorageKind::None => CacheStore::unavailable(self.cache_prefix.clone(), ttl),
        };

        Ok(store)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_prefix: DEFAULT_PREFIX.to_string(),
            default_ttl: 300,
            storage_backend: StorageKind::Memory,
            storage_path: PathBuf::from("luckydraw_cache.json"),
            storage_quota: DEFAULT_QUOTA_BYTES,
            fetch_policy: FetchPolicy::CacheFirst,
            server_port: 3000,
            cleanup_interval: 60,
        }
    }
}
