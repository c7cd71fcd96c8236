//! Queries over a single snapshot: listing and hierarchy walks

use crate::session::Session;
use crate::util;
use anyhow::{Context, Result};
use jule_hierarchy::{list_entries, HierarchyExtractor, TraversalEngine};
use std::path::Path;

pub async fn list(session: &Session, snapshot: &Path, select: &[String]) -> Result<()> {
    let (_, data) = util::open_snapshot(snapshot, &session.config.data_dir)?;
    let extractor = session.plugin.extractor();
    let hierarchy = HierarchyExtractor::new(&data, extractor.as_ref());

    let properties = util::expand_select(select, session.plugin.as_ref());
    session.emit(list_entries(&hierarchy, &properties))
}

pub async fn subordinates(
    session: &Session,
    snapshot: &Path,
    pattern: &str,
    max_distance: Option<usize>,
    min_distance: usize,
    select: &[String],
) -> Result<()> {
    let (_, data) = util::open_snapshot(snapshot, &session.config.data_dir)?;
    let extractor = session.plugin.extractor();
    let hierarchy = HierarchyExtractor::new(&data, extractor.as_ref());
    let engine = TraversalEngine::new(&hierarchy);

    let properties = util::expand_select(select, session.plugin.as_ref());
    let rows = engine
        .subordinate_tree(pattern, max_distance, min_distance, &properties)
        .context("Subordinate query failed")?;
    session.emit(rows)
}

pub async fn root_path(session: &Session, snapshot: &Path, pattern: &str, select: &[String]) -> Result<()> {
    let (_, data) = util::open_snapshot(snapshot, &session.config.data_dir)?;
    let extractor = session.plugin.extractor();
    let hierarchy = HierarchyExtractor::new(&data, extractor.as_ref());
    let engine = TraversalEngine::new(&hierarchy);

    let properties = util::expand_select(select, session.plugin.as_ref());
    let rows = engine
        .root_path(pattern, &properties)
        .context("Root path query failed")?;
    session.emit(rows)
}
