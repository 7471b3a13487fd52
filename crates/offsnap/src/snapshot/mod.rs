//! # Snapshot Cache
//!
//! Content-addressed snapshot regions and the builder that populates them.
//! A region is an isolated URL -> response mapping named by a manifest
//! version hash; entries are never rewritten with different content, so
//! writes are idempotent per URL.

mod builder;
pub mod providers;
mod types;

pub use builder::{ResourceOutcome, SnapshotBuilder, SnapshotOutcome};
pub use types::{ResponseMeta, StoreResult, StoredResponse};

pub use providers::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
