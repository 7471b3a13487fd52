//! # File Ledger Store
//!
//! Single-file JSON ledger store. The whole database is one document; a
//! commit re-reads it, applies the batch, and renames a freshly written
//! temporary file into place, so readers only ever observe a fully committed
//! document.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io;
use tokio::sync::Mutex;
use tracing::debug;

use crate::ledger::store::{KeyValueStore, StoreName, WriteBatch};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    manifests: BTreeMap<String, serde_json::Value>,
    pages: BTreeMap<String, serde_json::Value>,
}

impl LedgerDocument {
    fn store(&self, name: StoreName) -> &BTreeMap<String, serde_json::Value> {
        match name {
            StoreName::Manifests => &self.manifests,
            StoreName::Pages => &self.pages,
        }
    }

    fn store_mut(&mut self, name: StoreName) -> &mut BTreeMap<String, serde_json::Value> {
        match name {
            StoreName::Manifests => &mut self.manifests,
            StoreName::Pages => &mut self.pages,
        }
    }
}

pub struct FileKeyValueStore {
    path: PathBuf,
    /// Serializes read-modify-write commits
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Create a store persisting to the given file. The file is created on
    /// first commit.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> io::Result<LedgerDocument> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                // A corrupt ledger must not be silently replaced by an empty
                // one; that would rewrite history.
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("failed to parse ledger document: {e}"),
                )
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(LedgerDocument::default()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, store: StoreName, key: &str) -> std::io::Result<Option<serde_json::Value>> {
        let document = self.load().await?;
        Ok(document.store(store).get(key).cloned())
    }

    async fn commit(&self, batch: WriteBatch) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.load().await?;
        let writes = batch.len();
        for (store, key, value) in batch.ops {
            document.store_mut(store).insert(key, value);
        }

        let json = serde_json::to_vec_pretty(&document).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("failed to serialize ledger document: {e}"),
            )
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).await?;
        if let Err(e) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        debug!(path = ?self.path, writes = writes, "ledger commit durable");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_before_any_commit() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("ledger.json"));
        assert!(store.get(StoreName::Manifests, "m").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let store = FileKeyValueStore::new(path.clone());
        let mut batch = WriteBatch::new();
        batch.put(StoreName::Manifests, "m", json!(["h1"]));
        batch.put(StoreName::Pages, "p", json!({"hash": "h1"}));
        store.commit(batch).await.unwrap();

        let reopened = FileKeyValueStore::new(path);
        assert_eq!(
            reopened.get(StoreName::Manifests, "m").await.unwrap(),
            Some(json!(["h1"]))
        );
        assert_eq!(
            reopened.get(StoreName::Pages, "p").await.unwrap(),
            Some(json!({"hash": "h1"}))
        );
    }

    #[tokio::test]
    async fn test_corrupt_document_surfaces_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        fs::write(&path, b"{ not json").await.unwrap();

        let store = FileKeyValueStore::new(path);
        assert!(store.get(StoreName::Manifests, "m").await.is_err());

        let mut batch = WriteBatch::new();
        batch.put(StoreName::Manifests, "m", json!([]));
        assert!(store.commit(batch).await.is_err());
    }

    #[tokio::test]
    async fn test_no_temp_file_remains_after_commit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        let store = FileKeyValueStore::new(path.clone());
        let mut batch = WriteBatch::new();
        batch.put(StoreName::Pages, "p", json!({"hash": "h1"}));
        store.commit(batch).await.unwrap();

        assert!(fs::try_exists(&path).await.unwrap());
        assert!(!fs::try_exists(path.with_extension("tmp")).await.unwrap());
    }
}
