//! # Snapshot Store
//!
//! This module defines the store trait that all snapshot region backends must
//! follow.

use async_trait::async_trait;
use url::Url;

use crate::snapshot::types::{StoreResult, StoredResponse};

/// A store of snapshot regions. Regions are logically partitioned by name
/// (a manifest version hash), so concurrent builds for different regions
/// never interfere; writes within one region are idempotent per URL.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Check whether a region holds an entry for the URL
    async fn contains(&self, region: &str, url: &Url) -> StoreResult<bool>;

    /// Get an entry from a region
    async fn get(&self, region: &str, url: &Url) -> StoreResult<Option<StoredResponse>>;

    /// Put an entry into a region, creating the region if absent
    async fn put(&self, region: &str, url: &Url, response: StoredResponse) -> StoreResult<()>;

    /// Look the URL up across all regions; used for the fallback path when a
    /// fresh fetch cannot be kept
    async fn match_any(&self, url: &Url) -> StoreResult<Option<StoredResponse>>;
}
