//! CLI command implementations

pub mod cache;
pub mod config;
pub mod diff;
pub mod plugins;
pub mod query;
pub mod sample;
pub mod snapshots;
pub mod timeline;
