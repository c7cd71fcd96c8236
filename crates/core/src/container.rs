//! Snapshot container codec
//!
//! A container file holds two independently compressed named segments,
//! `metadata` and `data`. Metadata can be read without decompressing (or even
//! reading) the data segment.
//!
//! Layout (format version 1, integers little-endian):
//! ```text
//! header:  magic "JULE" (4) | version u16 | segment_count u16
//! segment: name_len u16 | name (UTF-8) | raw_len u64 | stored_len u64 | payload
//! ```
//! Payloads are bincode-encoded schema structs compressed with zstd.

use crate::snapshot::{SnapshotData, SnapshotMetadata, StorageContainer};
use crate::store::atomic_write;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;

/// zstd level for both segments; higher levels cost little at snapshot sizes
pub const COMPRESS_LEVEL: i32 = 19;

const METADATA_SEGMENT: &str = "metadata";
const DATA_SEGMENT: &str = "data";

/// Errors raised while saving or loading a container
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("not a snapshot container (bad magic or truncated header)")]
    NotAContainer,

    #[error("unsupported container format version {0}")]
    UnsupportedVersion(u16),

    #[error("container is missing the '{0}' segment")]
    MissingSegment(&'static str),

    #[error("container segment '{segment}' is corrupt: {reason}")]
    Corrupt { segment: String, reason: String },

    #[error("refusing to save a container without data")]
    MissingData,

    #[error("metadata declares {declared} entries but data holds {actual}")]
    EntryCountMismatch { declared: u64, actual: u64 },

    #[error("failed to encode segment '{segment}': {source}")]
    Encode {
        segment: &'static str,
        #[source]
        source: bincode::Error,
    },

    #[error("container I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ContainerError {
    /// True when the bytes look like a container but cannot be decoded
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            ContainerError::Corrupt { .. }
                | ContainerError::MissingSegment(_)
                | ContainerError::UnsupportedVersion(_)
        )
    }

    fn corrupt(segment: &str, reason: impl ToString) -> Self {
        ContainerError::Corrupt {
            segment: segment.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Container header format (version 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeaderV1 {
    /// Magic bytes: "JULE"
    pub magic: [u8; 4],
    /// Format version
    pub version: u16,
    /// Number of segments that follow
    pub segment_count: u16,
}

impl ContainerHeaderV1 {
    pub const MAGIC: [u8; 4] = *b"JULE";
    pub const VERSION: u16 = 1;
    pub const LEN: usize = 8;

    /// Create a header for the current format version
    pub fn new(segment_count: u16) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            segment_count,
        }
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut bytes = [0u8; Self::LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.segment_count.to_le_bytes());
        bytes
    }

    /// Deserialize header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ContainerError> {
        if bytes.len() < Self::LEN || bytes[0..4] != Self::MAGIC {
            return Err(ContainerError::NotAContainer);
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != Self::VERSION {
            return Err(ContainerError::UnsupportedVersion(version));
        }

        Ok(Self {
            magic: Self::MAGIC,
            version,
            segment_count: u16::from_le_bytes([bytes[6], bytes[7]]),
        })
    }
}

/// Per-segment header preceding each payload
struct SegmentHeader {
    name: String,
    raw_len: u64,
    stored_len: u64,
}

impl SegmentHeader {
    fn write<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        let name = self.name.as_bytes();
        let name_len = u16::try_from(name.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "segment name too long"))?;
        sink.write_all(&name_len.to_le_bytes())?;
        sink.write_all(name)?;
        sink.write_all(&self.raw_len.to_le_bytes())?;
        sink.write_all(&self.stored_len.to_le_bytes())?;
        Ok(())
    }

    fn read<R: Read>(source: &mut R) -> Result<Self, ContainerError> {
        let truncated = |e: io::Error| ContainerError::corrupt("<segment header>", e);

        let mut u16_buf = [0u8; 2];
        source.read_exact(&mut u16_buf).map_err(truncated)?;
        let mut name = vec![0u8; u16::from_le_bytes(u16_buf) as usize];
        source.read_exact(&mut name).map_err(truncated)?;
        let name = String::from_utf8(name)
            .map_err(|_| ContainerError::corrupt("<segment header>", "segment name is not UTF-8"))?;

        let mut u64_buf = [0u8; 8];
        source.read_exact(&mut u64_buf).map_err(truncated)?;
        let raw_len = u64::from_le_bytes(u64_buf);
        source.read_exact(&mut u64_buf).map_err(truncated)?;
        let stored_len = u64::from_le_bytes(u64_buf);

        Ok(Self {
            name,
            raw_len,
            stored_len,
        })
    }
}

/// Serialize and compress one object into a segment
fn encode_segment<T: Serialize>(name: &'static str, value: &T) -> Result<(SegmentHeader, Vec<u8>), ContainerError> {
    let raw = bincode::serialize(value).map_err(|source| ContainerError::Encode {
        segment: name,
        source,
    })?;
    let compressed = zstd::encode_all(raw.as_slice(), COMPRESS_LEVEL)?;

    let header = SegmentHeader {
        name: name.to_string(),
        raw_len: raw.len() as u64,
        stored_len: compressed.len() as u64,
    };
    Ok((header, compressed))
}

/// Read, decompress and deserialize one segment payload
fn decode_segment<T: DeserializeOwned, R: Read>(
    source: &mut R,
    header: &SegmentHeader,
) -> Result<T, ContainerError> {
    let mut payload = Vec::new();
    source.take(header.stored_len).read_to_end(&mut payload)?;
    if payload.len() as u64 != header.stored_len {
        return Err(ContainerError::corrupt(&header.name, "truncated payload"));
    }

    let raw = zstd::decode_all(payload.as_slice())
        .map_err(|e| ContainerError::corrupt(&header.name, e))?;
    if raw.len() as u64 != header.raw_len {
        return Err(ContainerError::corrupt(
            &header.name,
            format!("expected {} bytes after decompression, got {}", header.raw_len, raw.len()),
        ));
    }

    bincode::deserialize(&raw).map_err(|e| ContainerError::corrupt(&header.name, e))
}

/// Write a container to a sink
///
/// Fails if the container has no data or its `entries_count` disagrees with
/// the data.
pub fn save<W: Write>(container: &StorageContainer, sink: &mut W) -> Result<(), ContainerError> {
    let data = container.data.as_ref().ok_or(ContainerError::MissingData)?;

    let actual = data.len() as u64;
    let mut metadata = container.metadata.clone();
    match metadata.entries_count {
        Some(declared) if declared != actual => {
            return Err(ContainerError::EntryCountMismatch { declared, actual });
        }
        Some(_) => {}
        None => metadata.entries_count = Some(actual),
    }

    tracing::info!(entries = actual, "Saving container");

    let segments = [
        encode_segment(METADATA_SEGMENT, &metadata)?,
        encode_segment(DATA_SEGMENT, data)?,
    ];

    sink.write_all(&ContainerHeaderV1::new(segments.len() as u16).to_bytes())?;
    for (header, payload) in &segments {
        header.write(sink)?;
        sink.write_all(payload)?;
    }
    sink.flush()?;
    Ok(())
}

/// Read a container from a seekable source
///
/// The metadata segment is always decoded. The data segment is decoded only
/// when `load_data` is true; otherwise its payload is skipped with a seek.
pub fn load<R: Read + Seek>(source: &mut R, load_data: bool) -> Result<StorageContainer, ContainerError> {
    let mut header_bytes = [0u8; ContainerHeaderV1::LEN];
    source.read_exact(&mut header_bytes).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => ContainerError::NotAContainer,
        _ => ContainerError::Io(e),
    })?;
    let header = ContainerHeaderV1::from_bytes(&header_bytes)?;

    let mut metadata: Option<SnapshotMetadata> = None;
    let mut data: Option<SnapshotData> = None;

    for _ in 0..header.segment_count {
        if metadata.is_some() && (!load_data || data.is_some()) {
            break;
        }

        let segment = SegmentHeader::read(source)?;
        match segment.name.as_str() {
            METADATA_SEGMENT if metadata.is_none() => {
                metadata = Some(decode_segment(source, &segment)?);
            }
            DATA_SEGMENT if load_data && data.is_none() => {
                data = Some(decode_segment(source, &segment)?);
            }
            _ => {
                let skip = i64::try_from(segment.stored_len)
                    .map_err(|_| ContainerError::corrupt(&segment.name, "segment length out of range"))?;
                source.seek(SeekFrom::Current(skip))?;
            }
        }
    }

    let metadata = metadata.ok_or(ContainerError::MissingSegment(METADATA_SEGMENT))?;
    if load_data && data.is_none() {
        return Err(ContainerError::MissingSegment(DATA_SEGMENT));
    }

    Ok(StorageContainer { data, metadata })
}

/// Save a container to a file, replacing it atomically
pub fn save_to_path(container: &StorageContainer, path: &Path) -> Result<(), ContainerError> {
    let mut buffer = Vec::new();
    save(container, &mut buffer)?;
    atomic_write(path, &buffer)?;
    tracing::debug!(path = %path.display(), bytes = buffer.len(), "Container written");
    Ok(())
}

/// Load a container from a file
pub fn load_from_path(path: &Path, load_data: bool) -> Result<StorageContainer, ContainerError> {
    let mut reader = BufReader::new(File::open(path)?);
    let container = load(&mut reader, load_data)?;
    if let Some(data) = &container.data {
        tracing::info!(path = %path.display(), entries = data.len(), "Loaded container");
    }
    Ok(container)
}

/// Load a container, treating any failure as "not a valid snapshot"
///
/// Files without the container magic are skipped quietly; files that look
/// like containers but fail to decode are logged as warnings.
pub fn try_load(path: &Path, load_data: bool) -> Option<StorageContainer> {
    match load_from_path(path, load_data) {
        Ok(container) => Some(container),
        Err(ContainerError::NotAContainer) => {
            tracing::debug!(path = %path.display(), "Skipping non-container file");
            None
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Unable to load container");
            None
        }
    }
}
