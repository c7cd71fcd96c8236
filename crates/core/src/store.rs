//! On-disk helpers shared by the container codec and the cache store

use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

/// Atomic write helper
///
/// Writes data to a temporary file in the target's directory, fsyncs it, then
/// renames it over the target path. Readers never observe a partial file.
pub fn atomic_write(target: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::Builder::new().prefix(".tmp").tempfile_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// File name for a freshly captured snapshot: `YYYYMMDD-HHMMSS_<label>.jule`
pub fn snapshot_file_name<Tz>(label: &str, now: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.jule", now.format("%Y%m%d-%H%M%S"), label)
}

/// Express `path` relative to `base`
///
/// Both paths are compared lexically. Components of `base` not shared with
/// `path` become `..`; when the paths have no common root, `path` is returned.
pub fn relative_path(path: &Path, base: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix(base) {
        return if stripped.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            stripped.to_path_buf()
        };
    }

    let path_components: Vec<Component> = path.components().collect();
    let base_components: Vec<Component> = base.components().collect();

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let rooted = |c: &[Component]| matches!(c.first(), Some(Component::RootDir | Component::Prefix(_)));
    if common == 0 && (rooted(&path_components) || rooted(&base_components)) {
        return path.to_path_buf();
    }

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component.as_os_str());
    }
    relative
}
