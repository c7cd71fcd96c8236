//! Per-day change timeline over a directory of snapshot containers
//!
//! This crate provides:
//! - Discovery of containers under a data directory (metadata-only loads)
//! - Day bucketing and representative selection
//! - Membership and property-change diff functions, with a cached wrapper
//! - Timeline assembly over consecutive buckets

pub mod bucket;
pub mod diff;
pub mod discovery;
pub mod timeline;

// Re-exports
pub use bucket::{bucketize, representative, BucketFn, BucketKey};
pub use diff::{
    cached, membership_diff, membership_diff_fn, pair_diff, path_key, property_diff,
    property_diff_fn, DiffError,
};
pub use discovery::{discover, label_filter, Discovered, DiscoveryError, MetadataFilter};
pub use timeline::{BucketSummary, Timeline, TimelineError};
