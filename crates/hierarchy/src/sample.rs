//! Built-in plugin for a plain `ou=People` layout
//!
//! Attributes used: `displayName`, `manager` (DN), `title`, `department`.

use crate::extractor::{EntryIndex, PropertyExtractor};
use crate::plugin::{Plugin, Query, QuerySet};
use jule_core::attr::load_text_attr;
use std::sync::Arc;

/// Property names understood by [`SampleExtractor`]
pub mod props {
    pub const DN: &str = "dn";
    pub const FULL_NAME: &str = "full_name";
    pub const MANAGER_NAME: &str = "manager_name";
    pub const TITLE: &str = "title";
    pub const DEPARTMENT: &str = "department";
    /// Raw manager reference; answered but not declared
    pub const MANAGER_DN: &str = "manager_dn";
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SampleExtractor;

impl PropertyExtractor for SampleExtractor {
    fn property_names(&self) -> Vec<String> {
        [
            props::DN,
            props::FULL_NAME,
            props::MANAGER_NAME,
            props::TITLE,
            props::DEPARTMENT,
        ]
        .iter()
        .map(|p| p.to_string())
        .collect()
    }

    fn extract(&self, index: &EntryIndex<'_>, dn: &str, property: &str) -> Option<String> {
        let entry = index.get(dn)?;
        match property {
            props::DN => Some(dn.to_string()),
            props::FULL_NAME => load_text_attr(entry, "displayName"),
            props::MANAGER_DN => load_text_attr(entry, "manager"),
            props::MANAGER_NAME => {
                let manager_dn = load_text_attr(entry, "manager")?;
                let manager = index.get(&manager_dn)?;
                load_text_attr(manager, "displayName")
            }
            props::TITLE => load_text_attr(entry, "title"),
            props::DEPARTMENT => load_text_attr(entry, "department"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SamplePlugin;

impl Plugin for SamplePlugin {
    fn name(&self) -> &str {
        "sample"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn query_sets(&self) -> Vec<QuerySet> {
        vec![QuerySet {
            label: "sample".to_string(),
            queries: vec![Query {
                root_dn: "ou=People,dc=example,dc=com".to_string(),
                filter: None,
            }],
            attributes: None,
        }]
    }

    fn extractor(&self) -> Arc<dyn PropertyExtractor> {
        Arc::new(SampleExtractor)
    }
}
