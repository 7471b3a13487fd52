//! # Memory Snapshot Store
//!
//! In-process snapshot store, useful for tests and for callers that rebuild
//! their snapshots on every start.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use url::Url;

use crate::snapshot::providers::provider::SnapshotStore;
use crate::snapshot::types::{StoreResult, StoredResponse};

/// Memory-backed snapshot store. Regions are kept in insertion-independent
/// sorted order so the global fallback lookup is deterministic.
#[derive(Default)]
pub struct MemorySnapshotStore {
    regions: RwLock<BTreeMap<String, BTreeMap<Url, StoredResponse>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a region, zero if the region does not exist.
    pub fn region_len(&self, region: &str) -> usize {
        self.regions
            .read()
            .get(region)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn contains(&self, region: &str, url: &Url) -> StoreResult<bool> {
        Ok(self
            .regions
            .read()
            .get(region)
            .is_some_and(|entries| entries.contains_key(url)))
    }

    async fn get(&self, region: &str, url: &Url) -> StoreResult<Option<StoredResponse>> {
        Ok(self
            .regions
            .read()
            .get(region)
            .and_then(|entries| entries.get(url))
            .cloned())
    }

    async fn put(&self, region: &str, url: &Url, response: StoredResponse) -> StoreResult<()> {
        self.regions
            .write()
            .entry(region.to_string())
            .or_default()
            .insert(url.clone(), response);
        debug!(region = region, url = %url, "stored entry in memory region");
        Ok(())
    }

    async fn match_any(&self, url: &Url) -> StoreResult<Option<StoredResponse>> {
        let regions = self.regions.read();
        for entries in regions.values() {
            if let Some(response) = entries.get(url) {
                return Ok(Some(response.clone()));
            }
        }
        Ok(None)
    }
}
