//! File-backed blob store.
//!
//! All blobs live in one JSON document mapping key to blob string.
//! Every write replaces the whole file atomically (temp file, then rename),
//! so a crash mid-write leaves the previous version intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use linkguard_core::error::{LinkGuardError, Result};
use linkguard_core::traits::PersistentStore;

/// File-backed key-value blob store.
///
/// # File Format
///
/// ```text
/// { "urlCache": "<snapshot JSON as a string>", ... }
/// ```
#[derive(Debug)]
pub struct FileStore {
    /// Path to the storage file
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store at `path`. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<HashMap<String, String>> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&contents).map_err(|e| {
            LinkGuardError::StorageError(format!("corrupt store file {}: {}", self.path.display(), e))
        })
    }

    async fn write_all(&self, blobs: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let serialized = serde_json::to_vec(blobs)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&serialized).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl PersistentStore for FileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut blobs = self.read_all().await?;
        Ok(blobs.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display(), bytes = value.len()))]
    async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut blobs = match self.read_all().await {
            Ok(blobs) => blobs,
            Err(e) => {
                warn!(error = %e, "Store file unreadable, rewriting it");
                HashMap::new()
            }
        };
        blobs.insert(key.to_string(), value);
        self.write_all(&blobs).await?;

        debug!("Store file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_new_store_creates_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::new(&path);
        assert!(store.get("urlCache").await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_set_and_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        {
            let store = FileStore::new(&path);
            store.set("urlCache", r#"{"a":1}"#.into()).await.unwrap();
            store.set("other", "x".into()).await.unwrap();
        }

        let store = FileStore::new(&path);
        assert_eq!(store.get("urlCache").await.unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(store.get("other").await.unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_on_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"garbage").unwrap();

        let store = FileStore::new(&path);
        let err = store.get("urlCache").await.unwrap_err();
        assert!(err.is_storage_error());
    }

    #[tokio::test]
    async fn test_write_recovers_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, b"garbage").unwrap();

        let store = FileStore::new(&path);
        store.set("urlCache", "{}".into()).await.unwrap();
        assert_eq!(store.get("urlCache").await.unwrap().as_deref(), Some("{}"));
    }
}
