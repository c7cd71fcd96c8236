//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use jule_core::SnapshotData;
use jule_hierarchy::Plugin;
use jule_timeline::diff::load_snapshot;
use std::path::{Path, PathBuf};

/// Resolve a snapshot argument
///
/// Paths that exist as given are used directly; otherwise the argument is
/// looked up under the data directory.
pub fn resolve_snapshot_path(argument: &Path, data_dir: &Path) -> Result<PathBuf> {
    if argument.exists() {
        return Ok(argument.to_path_buf());
    }
    let under_data = data_dir.join(argument);
    if under_data.exists() {
        return Ok(under_data);
    }
    anyhow::bail!(
        "Snapshot not found: {} (also looked in {})",
        argument.display(),
        data_dir.display()
    )
}

/// Resolve and fully load a snapshot named on the command line
pub fn open_snapshot(argument: &Path, data_dir: &Path) -> Result<(PathBuf, SnapshotData)> {
    let path = resolve_snapshot_path(argument, data_dir)?;
    let data = load_snapshot(&path).with_context(|| format!("Cannot read snapshot {}", argument.display()))?;
    Ok((path, data))
}

/// Expand `--select` values
///
/// No selection means the plugin's default columns; `*` means every
/// declared property.
pub fn expand_select(selected: &[String], plugin: &dyn Plugin) -> Vec<String> {
    if selected.is_empty() {
        return plugin.default_properties();
    }
    let all = plugin.extractor().property_names();
    let mut expanded = Vec::new();
    for item in selected {
        if item == "*" {
            expanded.extend(all.iter().cloned());
        } else {
            expanded.push(item.clone());
        }
    }
    expanded
}

/// Format a capture timestamp in local time ("2024-01-03 14:30:00")
pub fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "invalid time".to_string(),
    }
}

/// Format file size in human-readable format
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
