//! Workflow integration tests
//!
//! Tests for complete workflows that exercise multiple commands
//! and validate end-to-end behavior.

pub mod housekeeping;
pub mod queries;
pub mod timeline;
