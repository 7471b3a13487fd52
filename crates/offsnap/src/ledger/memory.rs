//! # Memory Ledger Store
//!
//! In-process ledger store for tests and ephemeral sessions.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::ledger::store::{KeyValueStore, StoreName, WriteBatch};

#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<(StoreName, String), serde_json::Value>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, store: StoreName, key: &str) -> std::io::Result<Option<serde_json::Value>> {
        Ok(self
            .entries
            .lock()
            .get(&(store, key.to_string()))
            .cloned())
    }

    async fn commit(&self, batch: WriteBatch) -> std::io::Result<()> {
        // Single lock over the whole batch keeps the commit atomic.
        let mut entries = self.entries.lock();
        for (store, key, value) in batch.ops {
            entries.insert((store, key), value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_missing_key() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get(StoreName::Pages, "k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_batch_commit_applies_all_writes() {
        let store = MemoryKeyValueStore::new();

        let mut batch = WriteBatch::new();
        batch.put(StoreName::Manifests, "m", json!(["h1"]));
        batch.put(StoreName::Pages, "p", json!({"hash": "h1"}));
        store.commit(batch).await.unwrap();

        assert_eq!(
            store.get(StoreName::Manifests, "m").await.unwrap(),
            Some(json!(["h1"]))
        );
        assert_eq!(
            store.get(StoreName::Pages, "p").await.unwrap(),
            Some(json!({"hash": "h1"}))
        );
    }

    #[tokio::test]
    async fn test_commit_overwrites_existing_value() {
        let store = MemoryKeyValueStore::new();

        let mut first = WriteBatch::new();
        first.put(StoreName::Pages, "p", json!({"hash": "h1"}));
        store.commit(first).await.unwrap();

        let mut second = WriteBatch::new();
        second.put(StoreName::Pages, "p", json!({"hash": "h2"}));
        store.commit(second).await.unwrap();

        assert_eq!(
            store.get(StoreName::Pages, "p").await.unwrap(),
            Some(json!({"hash": "h2"}))
        );
    }
}
