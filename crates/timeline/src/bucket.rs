//! Day buckets over discovered containers

use crate::discovery::Discovered;
use chrono::{DateTime, Datelike, Local, TimeZone};
use jule_core::snapshot::timestamp_to_datetime;
use std::collections::BTreeMap;
use std::fmt;

/// Calendar-day bucket key, `YYYY-MM-DD`
///
/// Keys sort lexicographically, which is chronological for this format.
/// Only years 0 through 9999 have a key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey(String);

/// Maps a capture timestamp to its bucket; `None` for unrepresentable times
pub type BucketFn = fn(f64) -> Option<BucketKey>;

impl BucketKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Day in the local time zone
    pub fn local_day(timestamp: f64) -> Option<Self> {
        let utc = timestamp_to_datetime(timestamp)?;
        Self::from_datetime(&utc.with_timezone(&Local))
    }

    /// Day in UTC
    pub fn utc_day(timestamp: f64) -> Option<Self> {
        Self::from_datetime(&timestamp_to_datetime(timestamp)?)
    }

    fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Option<Self>
    where
        Tz::Offset: fmt::Display,
    {
        // %Y signs years outside this range, which breaks the ordering
        if !(0..=9999).contains(&dt.year()) {
            return None;
        }
        Some(Self(dt.format("%Y-%m-%d").to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group containers by bucket key, keys ascending
///
/// Containers whose timestamp has no bucket are dropped with a warning.
pub fn bucketize(items: Vec<Discovered>, bucket_fn: BucketFn) -> BTreeMap<BucketKey, Vec<Discovered>> {
    let mut buckets: BTreeMap<BucketKey, Vec<Discovered>> = BTreeMap::new();
    for item in items {
        match bucket_fn(item.timestamp()) {
            Some(key) => buckets.entry(key).or_default().push(item),
            None => {
                tracing::warn!(
                    path = %item.path.display(),
                    timestamp = item.timestamp(),
                    "Timestamp out of range, skipping"
                );
            }
        }
    }
    buckets
}

/// The earliest capture in a bucket; ties go to the smaller path
pub fn representative(members: &[Discovered]) -> Option<&Discovered> {
    members.iter().min_by(|a, b| {
        a.timestamp()
            .total_cmp(&b.timestamp())
            .then_with(|| a.path.cmp(&b.path))
    })
}
