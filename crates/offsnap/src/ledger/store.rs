//! # Ledger Key-Value Store
//!
//! The transactional store contract the version ledger is built on. A
//! [`WriteBatch`] is the unit of transaction: `commit` applies every write in
//! it atomically, and `commit` resolving is the completion signal dependent
//! operations must await.

use async_trait::async_trait;

/// Logical object stores within the ledger database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreName {
    /// Manifest URL -> version history
    Manifests,
    /// Page URL -> (manifest URL, hash) association
    Pages,
}

/// A batch of writes applied atomically by [`KeyValueStore::commit`].
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    pub(crate) ops: Vec<(StoreName, String, serde_json::Value)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put; an existing value under the same key is overwritten.
    pub fn put(&mut self, store: StoreName, key: impl Into<String>, value: serde_json::Value) {
        self.ops.push((store, key.into(), value));
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Durable key-value storage with atomic batch commits.
///
/// A failed `commit` must leave the store untouched; callers may not treat
/// anything as persisted until `commit` has returned `Ok`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, store: StoreName, key: &str) -> std::io::Result<Option<serde_json::Value>>;

    async fn commit(&self, batch: WriteBatch) -> std::io::Result<()>;
}
