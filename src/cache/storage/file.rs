//! File-backed storage backend.
//!
//! Keeps the working set in a `MemoryStorage` and rewrites a JSON snapshot
//! after every mutation, so entries survive process restarts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{MemoryStorage, StorageBackend};
use crate::error::StorageError;

// == File Storage ==
/// Durable storage persisted as a single JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    /// In-memory working set
    inner: MemoryStorage,
    /// Snapshot location
    path: PathBuf,
    /// Serializes mutate-then-persist sequences
    write_lock: Mutex<()>,
}

impl FileStorage {
    // == Open ==
    /// Opens the store at `path`, loading any existing snapshot.
    ///
    /// A missing file opens an empty store. A file that does not contain a
    /// JSON object of strings is rejected with `StorageError::Corrupt`.
    pub async fn open(path: impl AsRef<Path>, quota: Option<usize>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let items: HashMap<String, String> = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        debug!("Opened file storage at {} with {} items", path.display(), items.len());

        Ok(Self {
            inner: MemoryStorage::from_items(items, quota),
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    /// Writes the current working set to a temp file and renames it over
    /// the snapshot.
    async fn persist(&self) -> Result<(), StorageError> {
        let snapshot = self.inner.snapshot().await;
        let bytes = serde_json::to_vec(&snapshot)?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Puts `key` back to `previous` in the working set after a failed
    /// persist, so memory keeps matching the snapshot on disk.
    async fn restore(&self, key: &str, previous: Option<String>) {
        let restored = match previous {
            Some(value) => self.inner.set_item(key, &value).await,
            None => self.inner.remove_item(key).await,
        };
        if let Err(err) = restored {
            warn!("Failed to restore {} after persist error: {}", key, err);
        }
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let previous = self.inner.get_item(key).await?;
        self.inner.set_item(key, value).await?;

        if let Err(err) = self.persist().await {
            self.restore(key, previous).await;
            return Err(err);
        }
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let Some(previous) = self.inner.get_item(key).await? else {
            return Ok(());
        };
        self.inner.remove_item(key).await?;

        if let Err(err) = self.persist().await {
            self.restore(key, Some(previous)).await;
            return Err(err);
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.keys().await
    }
}
