//! # Snapshot Builder
//!
//! Fans out concurrent resource fetches for one manifest version and
//! populates the region named by its hash under the retention policy.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info};
use url::Url;

use crate::error::EngineError;
use crate::fetch::ResourceFetch;
use crate::retention::{classify, RetentionDecision};
use crate::snapshot::providers::SnapshotStore;
use crate::snapshot::types::StoredResponse;

/// How a single URL ended up in (or out of) the new region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceOutcome {
    /// Fresh response stored
    Stored,
    /// Deliberately absent (no-store, 404, 410)
    Skipped,
    /// Prior copy carried over unchanged
    FellBack,
    /// Fallback wanted but no prior copy existed; absent from the region
    MissingFallback,
}

/// Per-URL report of one completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotOutcome {
    /// Region name, i.e. the manifest version hash
    pub region: String,
    pub resources: BTreeMap<Url, ResourceOutcome>,
}

impl SnapshotOutcome {
    fn count(&self, outcome: ResourceOutcome) -> usize {
        self.resources.values().filter(|o| **o == outcome).count()
    }

    pub fn stored(&self) -> usize {
        self.count(ResourceOutcome::Stored)
    }

    pub fn skipped(&self) -> usize {
        self.count(ResourceOutcome::Skipped)
    }

    pub fn fell_back(&self) -> usize {
        self.count(ResourceOutcome::FellBack)
    }
}

/// Populates snapshot regions. Fetches are independent and concurrent; the
/// build completes only once every URL has resolved to an outcome, and one
/// URL's fetch failure never aborts the others. A store write failure does
/// abort the build: a version entry must never be committed over a region
/// that silently dropped writes.
pub struct SnapshotBuilder {
    fetcher: Arc<dyn ResourceFetch>,
    store: Arc<dyn SnapshotStore>,
}

impl SnapshotBuilder {
    pub fn new(fetcher: Arc<dyn ResourceFetch>, store: Arc<dyn SnapshotStore>) -> Self {
        Self { fetcher, store }
    }

    /// Build (or idempotently re-build) the region named `hash` from the
    /// given URL set. Callers avoid redundant builds via the resolver's
    /// fast path; re-invocation for a completed region is safe.
    pub async fn build(
        &self,
        hash: &str,
        urls: BTreeSet<Url>,
    ) -> Result<SnapshotOutcome, EngineError> {
        let tasks = urls
            .into_iter()
            .map(|url| self.capture(hash, url))
            .collect::<Vec<_>>();

        // Fan-out then barrier-join: relative completion order of the
        // individual fetches is unspecified.
        let results = join_all(tasks).await;

        let mut resources = BTreeMap::new();
        for result in results {
            let (url, outcome) = result?;
            resources.insert(url, outcome);
        }

        let outcome = SnapshotOutcome {
            region: hash.to_string(),
            resources,
        };
        info!(
            region = hash,
            total = outcome.resources.len(),
            stored = outcome.stored(),
            skipped = outcome.skipped(),
            fell_back = outcome.fell_back(),
            "snapshot build complete"
        );
        Ok(outcome)
    }

    async fn capture(&self, region: &str, url: Url) -> Result<(Url, ResourceOutcome), EngineError> {
        let fetched = self.fetcher.fetch_resource(&url).await;
        let decision = classify(fetched.as_ref());
        debug!(region = region, url = %url, decision = ?decision, "classified resource fetch");

        let outcome = match (decision, fetched) {
            (RetentionDecision::Keep, Ok(response)) => {
                self.store
                    .put(region, &url, StoredResponse::from(response))
                    .await?;
                ResourceOutcome::Stored
            }
            (RetentionDecision::Skip, _) => ResourceOutcome::Skipped,
            (RetentionDecision::Keep, Err(_)) | (RetentionDecision::Fallback, _) => {
                match self.store.match_any(&url).await? {
                    Some(prior) => {
                        self.store.put(region, &url, prior).await?;
                        ResourceOutcome::FellBack
                    }
                    None => ResourceOutcome::MissingFallback,
                }
            }
        };

        Ok((url, outcome))
    }
}
