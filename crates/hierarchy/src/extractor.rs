//! Entry index and property extraction over one snapshot

use jule_core::{Entry, Record, SnapshotData, Value};
use std::collections::HashMap;

/// Pluggable capability turning raw entry attributes into named properties
///
/// Implementations receive the snapshot's [`EntryIndex`] so they can resolve
/// references to other entries (a manager's display name, for instance).
pub trait PropertyExtractor: Send + Sync {
    /// Every property this extractor declares, in display order
    fn property_names(&self) -> Vec<String>;

    /// Extract one property; `None` when undefined for this entry, when the
    /// DN is not in the snapshot or when the property is unknown
    fn extract(&self, index: &EntryIndex<'_>, dn: &str, property: &str) -> Option<String>;
}

/// DN -> entry lookup for one snapshot
///
/// DN uniqueness is not enforced: a later duplicate overrides an earlier one,
/// while `dns()` keeps the position of first appearance.
#[derive(Debug, Default)]
pub struct EntryIndex<'a> {
    by_dn: HashMap<&'a str, &'a Entry>,
    order: Vec<&'a str>,
}

impl<'a> EntryIndex<'a> {
    /// Index every entry of a snapshot
    pub fn build(data: &'a SnapshotData) -> Self {
        let mut by_dn = HashMap::with_capacity(data.len());
        let mut order = Vec::with_capacity(data.len());

        for (dn, entry) in data.iter() {
            if by_dn.insert(dn, entry).is_none() {
                order.push(dn);
            }
        }

        Self { by_dn, order }
    }

    pub fn get(&self, dn: &str) -> Option<&'a Entry> {
        self.by_dn.get(dn).copied()
    }

    pub fn contains(&self, dn: &str) -> bool {
        self.by_dn.contains_key(dn)
    }

    /// The indexed copy of `dn`, borrowed for the snapshot's lifetime
    pub fn resolve(&self, dn: &str) -> Option<&'a str> {
        self.by_dn.get_key_value(dn).map(|(key, _)| *key)
    }

    /// Distinct DNs in snapshot order
    pub fn dns(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A snapshot's entry index bound to an extractor
pub struct HierarchyExtractor<'a> {
    index: EntryIndex<'a>,
    extractor: &'a dyn PropertyExtractor,
    property_names: Vec<String>,
}

impl<'a> HierarchyExtractor<'a> {
    pub fn new(data: &'a SnapshotData, extractor: &'a dyn PropertyExtractor) -> Self {
        Self {
            index: EntryIndex::build(data),
            property_names: extractor.property_names(),
            extractor,
        }
    }

    pub fn index(&self) -> &EntryIndex<'a> {
        &self.index
    }

    /// Declared properties, captured once at construction
    pub fn property_names(&self) -> &[String] {
        &self.property_names
    }

    pub fn contains(&self, dn: &str) -> bool {
        self.index.contains(dn)
    }

    pub fn extract(&self, dn: &str, property: &str) -> Option<String> {
        self.extractor.extract(&self.index, dn, property)
    }

    /// Every declared property of an entry
    ///
    /// Undefined properties are omitted when `skip_missing` is set and
    /// included as `Null` otherwise.
    pub fn extract_all(&self, dn: &str, skip_missing: bool) -> Record {
        let mut record = Record::with_capacity(self.property_names.len());
        for property in &self.property_names {
            match self.extract(dn, property) {
                Some(value) => {
                    record.insert(property.clone(), Value::Text(value));
                }
                None if skip_missing => {}
                None => {
                    record.insert(property.clone(), Value::Null);
                }
            }
        }
        record
    }

    /// The named properties of an entry, `Null` where undefined
    pub fn select(&self, dn: &str, properties: &[String]) -> Record {
        properties
            .iter()
            .map(|property| (property.clone(), Value::from(self.extract(dn, property))))
            .collect()
    }
}
