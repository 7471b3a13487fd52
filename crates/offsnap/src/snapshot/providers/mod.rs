//! # Snapshot Store Providers
//!
//! Implementations of the byte-response store behind the snapshot cache.

mod file;
mod memory;
mod provider;

pub use file::FileSnapshotStore;
pub use memory::MemorySnapshotStore;
pub use provider::SnapshotStore;
