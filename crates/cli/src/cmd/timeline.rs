//! Day-by-day membership and property-change timelines

use crate::session::Session;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use jule_core::{CacheStore, Record};
use jule_hierarchy::Plugin;
use jule_timeline::{
    cached, label_filter, membership_diff_fn, path_key, property_diff_fn, BucketKey, DiffError,
    Timeline,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

type BoxedDiff = Box<dyn Fn(&Path, &Path) -> Result<Vec<Record>, DiffError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Arrivals and departures
    Membership,
    /// Property changes of entries present on both days
    Changes,
}

impl Kind {
    /// Cache namespace for this kind of diff
    fn cache_type(self) -> &'static str {
        match self {
            Kind::Membership => "timeline",
            Kind::Changes => "changes",
        }
    }

    /// Cached diff function; the key covers the plugin and, for changes, the
    /// directory that reported paths are relative to
    fn diff_fn(self, cache: CacheStore, plugin: &Arc<dyn Plugin>, data_dir: PathBuf) -> BoxedDiff {
        let mut params = vec![
            ("plugin".to_string(), plugin.name().to_string()),
            ("plugin_version".to_string(), plugin.version().to_string()),
        ];
        let extractor = plugin.extractor();
        match self {
            Kind::Membership => Box::new(cached(cache, self.cache_type(), params, membership_diff_fn(extractor))),
            Kind::Changes => {
                params.push(("base_dir".to_string(), path_key(&data_dir)));
                Box::new(cached(cache, self.cache_type(), params, property_diff_fn(extractor, data_dir)))
            }
        }
    }
}

pub async fn run(session: &Session, kind: Kind, label: Option<String>) -> Result<()> {
    let data_dir = session.data_dir()?;
    let diff_fn = kind.diff_fn(session.cache(), &session.plugin, data_dir.clone());
    let dispatch = session.dispatch.clone();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Building {} timeline from {}", kind.cache_type(), data_dir.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let build = tokio::task::spawn_blocking(move || {
        tracing::dispatcher::with_default(&dispatch, || {
            let filter = label.map(label_filter);
            Timeline::from_dir(&data_dir, filter.as_deref(), BucketKey::local_day, diff_fn)
        })
    })
    .await
    .context("Timeline worker stopped unexpectedly");
    spinner.finish_and_clear();

    let mut timeline = build??;
    if timeline.buckets.len() < 2 {
        tracing::warn!(
            buckets = timeline.buckets.len(),
            "Need snapshots from at least two days to build a timeline"
        );
    }
    for bucket in &timeline.buckets {
        tracing::debug!(
            day = %bucket.key,
            containers = bucket.containers,
            representative = %bucket.representative.display(),
            "Bucket"
        );
    }

    let dropped = timeline.remove_empty_columns();
    if !dropped.is_empty() {
        tracing::debug!(columns = ?dropped, "Removed empty columns");
    }
    session.emit(timeline.rows)
}
