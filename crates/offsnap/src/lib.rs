//! # Offsnap
//!
//! An engine migrating legacy offline resource manifests to per-version
//! snapshot caches: each observed manifest version gets a content hash, an
//! append-only history entry, and an isolated snapshot region populated by
//! concurrent resource fetches under a keep/skip/fallback retention policy.
//!
//! ## Features
//!
//! - Content-hash versioning with a zero-fetch fast path for known versions
//! - Concurrent snapshot builds; one failed fetch never aborts the rest
//! - Fallback to prior copies for unreachable resources
//! - Transactional version history and page associations
//! - Pluggable manifest parsing, storage, and transport seams

pub mod builder;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ledger;
pub mod manifest;
pub mod orchestrator;
pub mod resolver;
pub mod retention;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use builder::EngineConfigBuilder;
pub use config::EngineConfig;
pub use error::{EngineError, FetchError, LedgerError};

// Re-export the transport seam
pub use fetch::{FetchedResponse, HttpFetcher, ResourceFetch, create_client};

// Re-export manifest model and parser seam
pub use manifest::{
    ManifestParser, ManifestSections, ManifestVersionEntry, NetworkEntry, ParsedManifest,
    version_hash,
};

// Re-export retention policy
pub use retention::{RetentionDecision, classify};

// Re-export snapshot storage and builder
pub use snapshot::{
    FileSnapshotStore, MemorySnapshotStore, ResourceOutcome, SnapshotBuilder, SnapshotOutcome,
    SnapshotStore, StoredResponse,
};

// Re-export ledger types
pub use ledger::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, PageAssociation, StoreName,
    VersionLedger, WriteBatch,
};

// Re-export resolution and orchestration entry points
pub use orchestrator::{PageLoadOrchestrator, PageLoadReport, PageLoadState};
pub use resolver::{Resolution, ResolutionOutcome, VersionResolver};
