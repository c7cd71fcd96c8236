//! Timeline assembly: discover, bucket, diff consecutive buckets

use crate::bucket::{bucketize, representative, BucketFn, BucketKey};
use crate::diff::DiffError;
use crate::discovery::{discover, Discovered, DiscoveryError, MetadataFilter};
use jule_core::record::{columns, remove_empty_columns};
use jule_core::{Record, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("diff for bucket {bucket} failed: {source}")]
    Diff { bucket: BucketKey, source: DiffError },
}

/// One day on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub key: BucketKey,
    /// Container the day is compared through
    pub representative: PathBuf,
    pub containers: usize,
}

/// Diff records across consecutive buckets, oldest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    pub buckets: Vec<BucketSummary>,
    pub rows: Vec<Record>,
}

impl Timeline {
    /// Discover containers under `root` and diff consecutive day buckets
    pub fn from_dir<F>(
        root: &Path,
        filter: Option<&MetadataFilter>,
        bucket_fn: BucketFn,
        diff_fn: F,
    ) -> Result<Self, TimelineError>
    where
        F: Fn(&Path, &Path) -> Result<Vec<Record>, DiffError>,
    {
        let discovered = discover(root, filter)?;
        Self::build(discovered, bucket_fn, diff_fn)
    }

    /// Bucket already-discovered containers and diff each consecutive pair
    ///
    /// Every record of a pair is tagged with the later bucket's key. The
    /// first bucket has no baseline and contributes no rows.
    pub fn build<F>(discovered: Vec<Discovered>, bucket_fn: BucketFn, diff_fn: F) -> Result<Self, TimelineError>
    where
        F: Fn(&Path, &Path) -> Result<Vec<Record>, DiffError>,
    {
        let buckets: Vec<BucketSummary> = bucketize(discovered, bucket_fn)
            .into_iter()
            .filter_map(|(key, members)| {
                let representative = representative(&members)?.path.clone();
                Some(BucketSummary {
                    key,
                    representative,
                    containers: members.len(),
                })
            })
            .collect();

        let mut rows = Vec::new();
        for pair in buckets.windows(2) {
            let (baseline, current) = (&pair[0], &pair[1]);
            tracing::debug!(
                bucket = %current.key,
                current = %current.representative.display(),
                baseline = %baseline.representative.display(),
                "Diffing bucket pair"
            );

            let records = diff_fn(&current.representative, &baseline.representative).map_err(|source| {
                TimelineError::Diff {
                    bucket: current.key.clone(),
                    source,
                }
            })?;

            rows.extend(records.into_iter().map(|mut record| {
                record.insert("bucket_key".to_string(), Value::from(current.key.as_str()));
                record
            }));
        }

        tracing::info!(buckets = buckets.len(), rows = rows.len(), "Timeline built");
        Ok(Self { buckets, rows })
    }

    /// Drop columns that are `Null` in every row; returns their names
    pub fn remove_empty_columns(&mut self) -> Vec<String> {
        remove_empty_columns(&mut self.rows)
    }

    /// Union of column names, in first-seen order
    pub fn columns(&self) -> Vec<String> {
        columns(&self.rows)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
