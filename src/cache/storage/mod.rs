//! Storage Backend Module
//!
//! The durable key-value store the cache is layered on. The trait mirrors a
//! browser-style string store: flat string keys, string values, and writes
//! that can be rejected when the quota is exhausted.

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageError;

pub use file::FileStorage;
pub use memory::MemoryStorage;

// == Public Constants ==
/// Default backend quota in bytes, matching typical browser local storage
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

// == Storage Backend ==
/// A shared string key-value store.
///
/// Implementations are shared by every namespace in the process, so callers
/// must only touch the keys they own.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` if absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Returns `StorageError::QuotaExceeded` if the write would push the
    /// backend past its quota. A rejected write leaves the old value intact.
    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Returns every key currently stored, in no particular order.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}
