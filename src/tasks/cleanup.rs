//! Expired Entry Sweep Task
//!
//! Background task that periodically evicts expired cache records, so
//! storage is reclaimed before a write runs into the quota.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// Returns a JoinHandle for the spawned task, which can be used to abort the
/// task during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::in_memory());
/// let cleanup_handle = spawn_cleanup_task(store.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<CacheStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.evict_expired().await;
            if removed == 0 {
                debug!("Cache sweep: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MemoryStorage, StorageBackend};

    fn store_over(backend: Arc<MemoryStorage>) -> Arc<CacheStore> {
        Arc::new(CacheStore::new(
            backend,
            "luckydraw_cache_",
            Duration::from_secs(300),
        ))
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let backend = Arc::new(MemoryStorage::new());
        let store = store_over(backend.clone());

        store
            .set("expire_soon", &"value", Some(Duration::from_millis(50)))
            .await;

        let handle = spawn_cleanup_task(store.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(350)).await;

        // Swept without any read touching the key
        assert!(backend
            .get_item("luckydraw_cache_expire_soon")
            .await
            .unwrap()
            .is_none());

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let store = store_over(Arc::new(MemoryStorage::new()));

        store
            .set("long_lived", &"value", Some(Duration::from_secs(3600)))
            .await;

        let handle = spawn_cleanup_task(store.clone(), Duration::from_millis(100));

        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(
            store.get::<String>("long_lived").await.as_deref(),
            Some("value")
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(CacheStore::in_memory());

        let handle = spawn_cleanup_task(store, Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
