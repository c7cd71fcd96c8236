//! Snapshot data model
//!
//! A snapshot is an ordered list of `(dn, entry)` pairs captured at one point
//! in time. A [`StorageContainer`] pairs it with [`SnapshotMetadata`] and is
//! the unit of persistence.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Distinguished name of a directory entry
pub type Dn = String;

/// One directory record: attribute name -> one or more raw values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    attributes: BTreeMap<String, Vec<Vec<u8>>>,
}

impl Entry {
    /// Create an empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper adding a single UTF-8 text value
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.attributes
            .insert(name.to_string(), vec![value.as_bytes().to_vec()]);
        self
    }

    /// Builder-style helper adding raw values
    pub fn with_values(mut self, name: &str, values: Vec<Vec<u8>>) -> Self {
        self.attributes.insert(name.to_string(), values);
        self
    }

    /// Raw values of an attribute
    pub fn get(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Check whether an attribute is present
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Iterate attributes in name order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &[Vec<u8>])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the entry has no attributes
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(String, Vec<Vec<u8>>)> for Entry {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Vec<u8>>)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

/// Entries of one snapshot, in capture order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotData {
    pub entries: Vec<(Dn, Entry)>,
}

impl SnapshotData {
    pub fn new(entries: Vec<(Dn, Entry)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(dn, entry)| (dn.as_str(), entry))
    }
}

/// How a snapshot was produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotParameters {
    /// Search roots the producer queried
    pub root_dns: Vec<String>,
    /// Requested attributes (`None` = all)
    pub attributes: Option<Vec<String>>,
    /// Identity of the plugin that drove the capture
    pub plugin_name: Option<String>,
    /// Free-form producer keys
    pub extra: BTreeMap<String, String>,
}

/// Small, independently loadable description of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Optional tag, usually the query-set name
    pub label: Option<String>,
    /// Capture time, seconds since epoch
    pub timestamp: f64,
    /// Display-only entry count; never trusted for control flow
    pub entries_count: Option<u64>,
    pub parameters: Option<SnapshotParameters>,
}

impl SnapshotMetadata {
    /// Metadata stamped with the current time
    pub fn now() -> Self {
        Self::at(current_timestamp())
    }

    /// Metadata stamped with an explicit capture time
    pub fn at(timestamp: f64) -> Self {
        Self {
            label: None,
            timestamp,
            entries_count: None,
            parameters: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_parameters(mut self, parameters: SnapshotParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Capture time as a UTC datetime (`None` if out of range)
    pub fn datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.timestamp)
    }
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self::now()
    }
}

/// A snapshot plus its metadata; `data` is `None` after a metadata-only load
#[derive(Debug, Clone, PartialEq)]
pub struct StorageContainer {
    pub data: Option<SnapshotData>,
    pub metadata: SnapshotMetadata,
}

impl StorageContainer {
    /// Pair freshly captured data with its metadata
    ///
    /// Fills `entries_count` from the data when the caller left it unset.
    pub fn new(data: SnapshotData, mut metadata: SnapshotMetadata) -> Self {
        if metadata.entries_count.is_none() {
            metadata.entries_count = Some(data.len() as u64);
        }
        Self {
            data: Some(data),
            metadata,
        }
    }

    /// Container holding only metadata
    pub fn metadata_only(metadata: SnapshotMetadata) -> Self {
        Self {
            data: None,
            metadata,
        }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

/// Current time as fractional seconds since epoch
pub fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Fractional epoch seconds as a UTC datetime
///
/// `None` for non-finite values and times chrono cannot represent.
pub fn timestamp_to_datetime(timestamp: f64) -> Option<chrono::DateTime<chrono::Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    chrono::DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
}
