//! # Version Ledger
//!
//! Durable, append-only history of manifest versions plus page associations,
//! built entirely on the [`KeyValueStore`] transaction contract.
//!
//! The ledger keeps no in-memory copy of history: every read goes to the
//! store, and an entry becomes visible only after its commit has been
//! confirmed. A failed commit therefore cannot desynchronize memory from
//! storage, and a failed snapshot build leaves at worst an orphan region
//! referenced by no history entry.

mod file;
mod memory;
mod store;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use store::{KeyValueStore, StoreName, WriteBatch};

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{EngineError, LedgerError};
use crate::manifest::ManifestVersionEntry;
use crate::snapshot::SnapshotOutcome;

/// Which manifest version a page was last resolved against.
/// At most one association per page URL, last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageAssociation {
    pub manifest_url: Url,
    pub hash: String,
}

pub struct VersionLedger {
    store: Arc<dyn KeyValueStore>,
}

impl VersionLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Version history for a manifest URL, oldest first; empty if unknown.
    pub async fn history(
        &self,
        manifest_url: &Url,
    ) -> Result<Vec<ManifestVersionEntry>, LedgerError> {
        match self
            .store
            .get(StoreName::Manifests, manifest_url.as_str())
            .await?
        {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Append a version entry, gated on its snapshot build.
    ///
    /// The build future runs to completion first; only then is the entry
    /// appended and committed, so a manifest version is never recorded as
    /// known without its resources having been processed at least once.
    /// Appending a hash already present in history is a no-op.
    pub async fn append_entry_and_snapshot<F, Fut>(
        &self,
        manifest_url: &Url,
        entry: ManifestVersionEntry,
        build: F,
    ) -> Result<SnapshotOutcome, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SnapshotOutcome, EngineError>>,
    {
        let outcome = build().await?;

        let mut history = self.history(manifest_url).await.map_err(EngineError::from)?;
        if history.iter().any(|existing| existing.hash == entry.hash) {
            debug!(
                manifest = %manifest_url,
                hash = %entry.hash,
                "hash already in history, append skipped"
            );
            return Ok(outcome);
        }

        let hash = entry.hash.clone();
        history.push(entry);

        let mut batch = WriteBatch::new();
        batch.put(
            StoreName::Manifests,
            manifest_url.as_str(),
            serde_json::to_value(&history).map_err(LedgerError::from)?,
        );
        self.store
            .commit(batch)
            .await
            .map_err(LedgerError::from)?;

        info!(
            manifest = %manifest_url,
            hash = %hash,
            versions = history.len(),
            "version history entry committed"
        );
        Ok(outcome)
    }

    /// Record which manifest version a page was built from, overwriting any
    /// prior association for that page URL.
    pub async fn set_page_association(
        &self,
        page_url: &Url,
        manifest_url: &Url,
        hash: &str,
    ) -> Result<(), LedgerError> {
        let association = PageAssociation {
            manifest_url: manifest_url.clone(),
            hash: hash.to_string(),
        };

        let mut batch = WriteBatch::new();
        batch.put(
            StoreName::Pages,
            page_url.as_str(),
            serde_json::to_value(&association)?,
        );
        self.store.commit(batch).await?;

        debug!(page = %page_url, manifest = %manifest_url, hash = hash, "page association committed");
        Ok(())
    }

    /// Current association for a page URL, if any.
    pub async fn page_association(
        &self,
        page_url: &Url,
    ) -> Result<Option<PageAssociation>, LedgerError> {
        match self.store.get(StoreName::Pages, page_url.as_str()).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
