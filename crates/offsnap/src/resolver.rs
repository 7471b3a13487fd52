//! # Version Resolver
//!
//! One resolution cycle: fetch the manifest, hash it, and either take the
//! fast path (hash already in history, no resource traffic at all) or run a
//! full rebuild through the snapshot builder and commit the new version
//! entry.

use std::sync::Arc;

use tracing::{debug, info};
use url::Url;

use crate::error::EngineError;
use crate::fetch::ResourceFetch;
use crate::ledger::VersionLedger;
use crate::manifest::{absolutize, version_hash, ManifestParser, ManifestVersionEntry};
use crate::snapshot::{SnapshotBuilder, SnapshotOutcome};

/// Whether a resolution cycle reused a known version or built a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Hash found in history; no resource was fetched
    UpToDate,
    /// New hash; a snapshot region was built and the entry committed
    Rebuilt(SnapshotOutcome),
}

/// Result of one completed resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Version hash the manifest resolved to
    pub hash: String,
    pub outcome: ResolutionOutcome,
}

pub struct VersionResolver {
    fetcher: Arc<dyn ResourceFetch>,
    parser: Arc<dyn ManifestParser>,
    ledger: Arc<VersionLedger>,
    builder: Arc<SnapshotBuilder>,
}

impl VersionResolver {
    pub fn new(
        fetcher: Arc<dyn ResourceFetch>,
        parser: Arc<dyn ManifestParser>,
        ledger: Arc<VersionLedger>,
        builder: Arc<SnapshotBuilder>,
    ) -> Self {
        Self {
            fetcher,
            parser,
            ledger,
            builder,
        }
    }

    /// Resolve the current version of a manifest URL.
    ///
    /// A manifest fetch failure is unrecoverable for the whole cycle and
    /// mutates nothing. The parser is only consulted on a full rebuild.
    pub async fn resolve(&self, manifest_url: &Url) -> Result<Resolution, EngineError> {
        let text = self.fetcher.fetch_manifest(manifest_url).await?;
        let hash = version_hash(manifest_url, &text);

        let history = self.ledger.history(manifest_url).await?;
        if history.iter().any(|entry| entry.hash == hash) {
            debug!(manifest = %manifest_url, hash = %hash, "manifest unchanged, fast path");
            return Ok(Resolution {
                hash,
                outcome: ResolutionOutcome::UpToDate,
            });
        }

        info!(
            manifest = %manifest_url,
            hash = %hash,
            known_versions = history.len(),
            "new manifest version, building snapshot"
        );

        let parsed = absolutize(&self.parser.parse(&text), manifest_url);
        let urls = parsed.snapshot_urls();
        let entry = ManifestVersionEntry {
            hash: hash.clone(),
            parsed,
        };

        let builder = Arc::clone(&self.builder);
        let region = hash.clone();
        let outcome = self
            .ledger
            .append_entry_and_snapshot(manifest_url, entry, move || async move {
                builder.build(&region, urls).await
            })
            .await?;

        Ok(Resolution {
            hash,
            outcome: ResolutionOutcome::Rebuilt(outcome),
        })
    }
}
