//! Cache Module
//!
//! Namespaced, expiring key-value caching over a pluggable storage backend,
//! plus the key and TTL tables every caller shares.

mod entry;
mod keys;
mod stats;
mod storage;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use keys::{CacheKey, CacheTtl, EventStatus};
pub use stats::CacheStats;
pub use storage::{FileStorage, MemoryStorage, StorageBackend, DEFAULT_QUOTA_BYTES};
pub use store::CacheStore;

// == Public Constants ==
/// Namespace prefix for every record the cache owns
pub const DEFAULT_PREFIX: &str = "luckydraw_cache_";
