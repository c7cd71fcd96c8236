//! Show entries added or removed between two snapshots

use crate::session::Session;
use crate::util;
use anyhow::Result;
use jule_timeline::pair_diff;
use std::path::Path;

pub async fn run(session: &Session, snapshot: &Path, baseline: &Path, select: &[String]) -> Result<()> {
    let data_dir = &session.config.data_dir;
    let (snapshot_path, current) = util::open_snapshot(snapshot, data_dir)?;
    let (baseline_path, previous) = util::open_snapshot(baseline, data_dir)?;

    let properties = util::expand_select(select, session.plugin.as_ref());
    let rows = pair_diff(session.plugin.extractor().as_ref(), &current, &previous, &properties);

    tracing::info!(
        current = %snapshot_path.display(),
        baseline = %baseline_path.display(),
        rows = rows.len(),
        "Snapshot diff complete"
    );
    session.emit(rows)
}
