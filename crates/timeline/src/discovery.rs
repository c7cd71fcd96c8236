//! Finding snapshot containers under a data directory

use jule_core::container::try_load;
use jule_core::SnapshotMetadata;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Predicate over metadata applied before bucketing
pub type MetadataFilter = dyn Fn(&SnapshotMetadata) -> bool + Send + Sync;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("data directory not found: {0}")]
    MissingRoot(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A container found on disk, loaded metadata-only
#[derive(Debug, Clone, PartialEq)]
pub struct Discovered {
    /// Absolute path
    pub path: PathBuf,
    pub metadata: SnapshotMetadata,
    /// File size in bytes
    pub size: u64,
}

impl Discovered {
    pub fn timestamp(&self) -> f64 {
        self.metadata.timestamp
    }
}

/// Keep only snapshots carrying `label`
pub fn label_filter(label: impl Into<String>) -> Box<MetadataFilter> {
    let label = label.into();
    Box::new(move |metadata: &SnapshotMetadata| metadata.label.as_deref() == Some(label.as_str()))
}

/// Walk `root` recursively and probe every regular file
///
/// Unreadable directory entries, non-container files and corrupt containers
/// are skipped. Results are sorted by (timestamp, path).
pub fn discover(root: &Path, filter: Option<&MetadataFilter>) -> Result<Vec<Discovered>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::MissingRoot(root.to_path_buf()));
    }
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };

    let mut found = Vec::new();
    let mut probed = 0usize;

    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        probed += 1;

        let Some(container) = try_load(entry.path(), false) else {
            continue;
        };
        if let Some(filter) = filter {
            if !filter(&container.metadata) {
                tracing::debug!(path = %entry.path().display(), "Filtered out");
                continue;
            }
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        found.push(Discovered {
            path: entry.into_path(),
            metadata: container.metadata,
            size,
        });
    }

    found.sort_by(|a, b| {
        a.timestamp()
            .total_cmp(&b.timestamp())
            .then_with(|| a.path.cmp(&b.path))
    });

    tracing::info!(root = %root.display(), probed, containers = found.len(), "Discovery complete");
    Ok(found)
}
