//! In-memory storage backend with an optional byte quota.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::StorageBackend;
use crate::error::StorageError;

// == Memory Storage ==
/// HashMap-backed storage.
///
/// Usage is measured as the sum of key and value lengths, the same way
/// browsers account local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    /// Stored items
    items: RwLock<HashMap<String, String>>,
    /// Maximum bytes in use, None = unbounded
    quota: Option<usize>,
}

impl MemoryStorage {
    // == Constructors ==
    /// Creates an unbounded in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an in-memory store that rejects writes past `quota` bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// Creates a store pre-populated with `items`.
    pub(crate) fn from_items(items: HashMap<String, String>, quota: Option<usize>) -> Self {
        Self {
            items: RwLock::new(items),
            quota,
        }
    }

    // == Usage ==
    /// Returns the number of bytes currently in use.
    pub async fn used_bytes(&self) -> usize {
        let items = self.items.read().await;
        items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Returns a copy of every stored item.
    pub async fn snapshot(&self) -> HashMap<String, String> {
        self.items.read().await.clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.read().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().await;

        if let Some(quota) = self.quota {
            let current: usize = items.iter().map(|(k, v)| k.len() + v.len()).sum();
            let replaced = items.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let used = current - replaced + key.len() + value.len();
            if used > quota {
                return Err(StorageError::QuotaExceeded { used, quota });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.items.read().await.keys().cloned().collect())
    }
}
