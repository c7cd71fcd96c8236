//! Jule Core - snapshot storage primitives for the directory timeline explorer
//!
//! This crate provides the foundational storage layer:
//! - Snapshot data model (entries, metadata, containers)
//! - Versioned container codec with independently compressed segments
//! - SHA-256 fingerprints over parameter mappings
//! - Content-addressed cache store for derived results
//! - Tabular records shared by diffs and queries

pub mod attr;
pub mod cache;
pub mod container;
pub mod hash;
pub mod record;
pub mod snapshot;
pub mod store;

// Re-export main types for convenience
pub use cache::{CacheError, CacheStats, CacheStore};
pub use container::{ContainerError, ContainerHeaderV1};
pub use hash::{fingerprint, Fingerprint};
pub use record::{OrderError, Record, Value};
pub use snapshot::{
    Dn, Entry, SnapshotData, SnapshotMetadata, SnapshotParameters, StorageContainer,
};
