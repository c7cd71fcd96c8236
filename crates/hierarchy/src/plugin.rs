//! Deployment plugins and their registry
//!
//! A plugin bundles what differs between directory deployments: which
//! subtrees a producer captures and how raw attributes become properties.
//! Plugins are registered explicitly at startup and looked up by name.

use crate::extractor::PropertyExtractor;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// One subtree search a producer runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub root_dn: String,
    pub filter: Option<String>,
}

/// A named group of searches captured into one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    pub label: String,
    pub queries: Vec<Query>,
    /// Attributes to request (`None` = all)
    pub attributes: Option<Vec<String>>,
}

pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn query_sets(&self) -> Vec<QuerySet>;

    fn extractor(&self) -> Arc<dyn PropertyExtractor>;

    /// Columns shown when the caller selects none
    fn default_properties(&self) -> Vec<String> {
        self.extractor().property_names()
    }
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unknown plugin '{name}' (known: {})", .known.join(", "))]
    Unknown { name: String, known: Vec<String> },
}

/// Name -> plugin
#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Arc<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every plugin shipped with jule
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(crate::sample::SamplePlugin));
        registry
    }

    /// Add a plugin, replacing any plugin with the same name
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        tracing::debug!(name = plugin.name(), version = plugin.version(), "Registering plugin");
        self.plugins.insert(plugin.name().to_string(), plugin);
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginError> {
        self.plugins
            .get(name)
            .cloned()
            .ok_or_else(|| PluginError::Unknown {
                name: name.to_string(),
                known: self.names(),
            })
    }

    pub fn names(&self) -> Vec<String> {
        self.plugins.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Plugin>> {
        self.plugins.values()
    }
}
