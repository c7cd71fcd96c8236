//! Content-addressed cache for derived results
//!
//! One file per key, named by the fingerprint's hex encoding, holding a
//! zstd-compressed bincode payload. A missing or unreadable file is a miss.
//!
//! There is no locking: concurrent `set` calls for one key race and the last
//! writer wins. Writes go through a temp file and an atomic rename, so a
//! reader never sees a half-written entry.

use crate::hash::Fingerprint;
use crate::store::atomic_write;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Cache payloads favour speed over size
const CACHE_COMPRESS_LEVEL: i32 = 3;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to encode cache value: {0}")]
    Encode(#[from] bincode::Error),

    #[error("cache I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Summary of the cache directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

/// Flat directory of fingerprint-addressed values
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the filesystem path for a key
    pub fn path_for(&self, key: &Fingerprint) -> PathBuf {
        self.dir.join(key.to_hex())
    }

    /// Check whether an entry file exists for a key
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.path_for(key).is_file()
    }

    /// Read a value
    ///
    /// Returns `None` when the entry is absent. An entry that cannot be read,
    /// decompressed or decoded is logged and also treated as a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &Fingerprint) -> Option<T> {
        let path = self.path_for(key);

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cache file unreadable");
                return None;
            }
        };

        let decoded = zstd::decode_all(bytes.as_slice())
            .map_err(|e| e.to_string())
            .and_then(|raw| bincode::deserialize(&raw).map_err(|e| e.to_string()));

        match decoded {
            Ok(value) => Some(value),
            Err(reason) => {
                tracing::warn!(path = %path.display(), %reason, "Cache file looks corrupted");
                None
            }
        }
    }

    /// Write a value, replacing any previous entry atomically
    pub fn set<T: Serialize>(&self, key: &Fingerprint, value: &T) -> Result<(), CacheError> {
        let raw = bincode::serialize(value)?;
        let compressed = zstd::encode_all(raw.as_slice(), CACHE_COMPRESS_LEVEL)?;
        atomic_write(&self.path_for(key), &compressed)?;
        Ok(())
    }

    /// Delete one entry; returns whether it existed
    pub fn remove(&self, key: &Fingerprint) -> Result<bool, CacheError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every entry file; returns how many were removed
    ///
    /// Files whose names are not fingerprints are left alone.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let mut removed = 0;
        for path in self.entry_paths()? {
            std::fs::remove_file(&path)?;
            removed += 1;
        }
        tracing::info!(dir = %self.dir.display(), removed, "Cache cleared");
        Ok(removed)
    }

    /// Count entries and their on-disk size
    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        let mut stats = CacheStats::default();
        for path in self.entry_paths()? {
            stats.entries += 1;
            stats.total_bytes += std::fs::metadata(&path)?.len();
        }
        Ok(stats)
    }

    fn entry_paths(&self) -> Result<Vec<PathBuf>, CacheError> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry?;
            let is_key = entry
                .file_name()
                .to_str()
                .and_then(Fingerprint::from_hex)
                .is_some();
            if is_key && entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        Ok(paths)
    }
}
