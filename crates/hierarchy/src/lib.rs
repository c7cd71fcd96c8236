//! Property extraction and reporting-hierarchy queries
//!
//! This crate provides:
//! - The property extractor capability and the per-snapshot entry index
//! - An explicit plugin registry (with the built-in `sample` plugin)
//! - Cycle-safe subordinate and root-path traversals

pub mod extractor;
pub mod plugin;
pub mod sample;
pub mod traversal;

// Re-exports
pub use extractor::{EntryIndex, HierarchyExtractor, PropertyExtractor};
pub use plugin::{Plugin, PluginError, PluginRegistry, Query, QuerySet};
pub use sample::{SampleExtractor, SamplePlugin};
pub use traversal::{list_entries, HierarchyKeys, NamePattern, TraversalEngine, TraversalError};
