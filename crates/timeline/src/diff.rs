//! Snapshot comparison functions
//!
//! A diff function takes `(current, baseline)` container paths and returns
//! records. Anything else its result depends on (base directory, plugin)
//! must be passed to [`cached`] as a key parameter.

use jule_core::container::load_from_path;
use jule_core::hash::fingerprint;
use jule_core::store::relative_path;
use jule_core::{CacheStore, ContainerError, Record, SnapshotData, Value};
use jule_hierarchy::{HierarchyExtractor, PropertyExtractor};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("failed to load snapshot {path}: {source}")]
    Load {
        path: PathBuf,
        source: ContainerError,
    },
}

/// Load an explicitly named snapshot with its data
pub fn load_snapshot(path: &Path) -> Result<SnapshotData, DiffError> {
    let container = load_from_path(path, true).map_err(|source| DiffError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    container.data.ok_or_else(|| DiffError::Load {
        path: path.to_path_buf(),
        source: ContainerError::MissingData,
    })
}

/// Entries that left or joined between two snapshots
///
/// Removed entries come first in baseline order, then added entries in
/// current order. Each record holds every declared property plus `action`.
pub fn membership_diff(
    extractor: &dyn PropertyExtractor,
    current: &SnapshotData,
    baseline: &SnapshotData,
) -> Vec<Record> {
    let current = HierarchyExtractor::new(current, extractor);
    let baseline = HierarchyExtractor::new(baseline, extractor);

    let tagged = |side: &HierarchyExtractor<'_>, dn: &str, action: &str| {
        let mut record = side.extract_all(dn, false);
        record.insert("action".to_string(), Value::from(action));
        record
    };

    let removed = baseline
        .index()
        .dns()
        .filter(|dn| !current.contains(dn))
        .map(|dn| tagged(&baseline, dn, "removed"));
    let added = current
        .index()
        .dns()
        .filter(|dn| !baseline.contains(dn))
        .map(|dn| tagged(&current, dn, "added"));

    removed.chain(added).collect()
}

/// Entries present in both snapshots whose properties changed
///
/// Only properties defined on both sides are compared. A record carries the
/// current values, every baseline value under `old_<prop>`, the changed
/// names in `updated_props`, and both paths relative to `base_dir`.
pub fn property_diff(
    extractor: &dyn PropertyExtractor,
    current: &SnapshotData,
    baseline: &SnapshotData,
    paths: (&Path, &Path),
    base_dir: &Path,
) -> Vec<Record> {
    let current = HierarchyExtractor::new(current, extractor);
    let baseline = HierarchyExtractor::new(baseline, extractor);
    let (current_path, baseline_path) = paths;

    let mut records = Vec::new();
    for dn in current.index().dns() {
        if !baseline.contains(dn) {
            continue;
        }

        let new_values = current.extract_all(dn, true);
        let old_values = baseline.extract_all(dn, true);

        let updated: Vec<&str> = current
            .property_names()
            .iter()
            .filter(|prop| match (new_values.get(*prop), old_values.get(*prop)) {
                (Some(new), Some(old)) => new != old,
                _ => false,
            })
            .map(String::as_str)
            .collect();
        if updated.is_empty() {
            continue;
        }

        let mut record = new_values.clone();
        for (prop, value) in &old_values {
            record.insert(format!("old_{prop}"), value.clone());
        }
        record.insert("updated_props".to_string(), Value::from(updated.join(", ")));
        record.insert(
            "path".to_string(),
            Value::from(relative_path(current_path, base_dir).display().to_string()),
        );
        record.insert(
            "baseline_path".to_string(),
            Value::from(relative_path(baseline_path, base_dir).display().to_string()),
        );
        records.push(record);
    }
    records
}

/// Membership diff of two named snapshots over selected properties
///
/// Added entries first, then removed, each tagged with a leading `diff`
/// column.
pub fn pair_diff(
    extractor: &dyn PropertyExtractor,
    current: &SnapshotData,
    baseline: &SnapshotData,
    properties: &[String],
) -> Vec<Record> {
    let current = HierarchyExtractor::new(current, extractor);
    let baseline = HierarchyExtractor::new(baseline, extractor);

    let tagged = |side: &HierarchyExtractor<'_>, dn: &str, diff: &str| {
        let mut record = Record::with_capacity(properties.len() + 1);
        record.insert("diff".to_string(), Value::from(diff));
        record.extend(side.select(dn, properties));
        record
    };

    let added = current
        .index()
        .dns()
        .filter(|dn| !baseline.contains(dn))
        .map(|dn| tagged(&current, dn, "added"));
    let removed = baseline
        .index()
        .dns()
        .filter(|dn| !current.contains(dn))
        .map(|dn| tagged(&baseline, dn, "removed"));

    added.chain(removed).collect()
}

/// [`membership_diff`] over container paths
pub fn membership_diff_fn(
    extractor: Arc<dyn PropertyExtractor>,
) -> impl Fn(&Path, &Path) -> Result<Vec<Record>, DiffError> + Send + Sync {
    move |current: &Path, baseline: &Path| {
        let current_data = load_snapshot(current)?;
        let baseline_data = load_snapshot(baseline)?;
        Ok(membership_diff(extractor.as_ref(), &current_data, &baseline_data))
    }
}

/// [`property_diff`] over container paths, reporting paths relative to `base_dir`
pub fn property_diff_fn(
    extractor: Arc<dyn PropertyExtractor>,
    base_dir: PathBuf,
) -> impl Fn(&Path, &Path) -> Result<Vec<Record>, DiffError> + Send + Sync {
    move |current: &Path, baseline: &Path| {
        let current_data = load_snapshot(current)?;
        let baseline_data = load_snapshot(baseline)?;
        Ok(property_diff(
            extractor.as_ref(),
            &current_data,
            &baseline_data,
            (current, baseline),
            &base_dir,
        ))
    }
}

/// Lossless cache-key form of a path: hex of its OS-encoded bytes
pub fn path_key(path: &Path) -> String {
    hex::encode(path.as_os_str().as_encoded_bytes())
}

/// Memoize a diff function in the cache store
///
/// The key is the fingerprint of `{cache_type, container_path, baseline_path}`
/// plus `params`, which name every other input the wrapped function depends
/// on. A parameter cannot shadow the three fixed keys. Errors are never
/// cached; a failed cache write is logged and the computed result still
/// returned.
pub fn cached<F>(
    cache: CacheStore,
    cache_type: impl Into<String>,
    params: Vec<(String, String)>,
    inner: F,
) -> impl Fn(&Path, &Path) -> Result<Vec<Record>, DiffError> + Send + Sync
where
    F: Fn(&Path, &Path) -> Result<Vec<Record>, DiffError> + Send + Sync,
{
    let cache_type = cache_type.into();
    move |current: &Path, baseline: &Path| {
        let mut properties: BTreeMap<&str, String> = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        properties.insert("cache_type", cache_type.clone());
        properties.insert("container_path", path_key(current));
        properties.insert("baseline_path", path_key(baseline));
        let key = fingerprint(&properties);

        if let Some(records) = cache.get::<Vec<Record>>(&key) {
            tracing::debug!(key = %key, cache_type = %cache_type, "Diff cache hit");
            return Ok(records);
        }

        tracing::info!(
            cache_type = %cache_type,
            current = %current.display(),
            baseline = %baseline.display(),
            "Diff cache miss, computing"
        );
        let records = inner(current, baseline)?;
        if let Err(e) = cache.set(&key, &records) {
            tracing::warn!(key = %key, error = %e, "Failed to store diff in cache");
        }
        Ok(records)
    }
}
