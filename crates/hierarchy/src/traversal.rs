//! Manager hierarchy walks
//!
//! The manager relationship comes from directory data and is not guaranteed
//! to be acyclic. Both walks are iterative and keep a visited set, so a
//! reporting loop ends the walk instead of the process.

use crate::extractor::HierarchyExtractor;
use glob::{MatchOptions, Pattern};
use jule_core::{Record, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraversalError {
    #[error("invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}

/// Which extracted properties carry the display name and the manager DN
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyKeys {
    pub name_property: String,
    pub manager_property: String,
}

impl Default for HierarchyKeys {
    fn default() -> Self {
        Self {
            name_property: "full_name".to_string(),
            manager_property: "manager_dn".to_string(),
        }
    }
}

/// Case-insensitive shell-style pattern over display names
#[derive(Debug, Clone)]
pub struct NamePattern {
    pattern: Pattern,
}

impl NamePattern {
    const OPTIONS: MatchOptions = MatchOptions {
        case_sensitive: false,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    pub fn new(pattern: &str) -> Result<Self, TraversalError> {
        let pattern = Pattern::new(pattern).map_err(|source| TraversalError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// A missing name is matched as the empty string
    pub fn matches(&self, name: Option<&str>) -> bool {
        self.pattern.matches_with(name.unwrap_or(""), Self::OPTIONS)
    }
}

/// Walks over one snapshot's manager relationships
pub struct TraversalEngine<'a> {
    extractor: &'a HierarchyExtractor<'a>,
    keys: HierarchyKeys,
    /// manager DN -> direct reports, in snapshot order
    subordinates: HashMap<String, Vec<&'a str>>,
}

impl<'a> TraversalEngine<'a> {
    pub fn new(extractor: &'a HierarchyExtractor<'a>) -> Self {
        Self::with_keys(extractor, HierarchyKeys::default())
    }

    pub fn with_keys(extractor: &'a HierarchyExtractor<'a>, keys: HierarchyKeys) -> Self {
        let mut subordinates: HashMap<String, Vec<&'a str>> = HashMap::new();
        for dn in extractor.index().dns() {
            if let Some(manager) = extractor.extract(dn, &keys.manager_property) {
                subordinates.entry(manager).or_default().push(dn);
            }
        }

        tracing::debug!(
            entries = extractor.index().len(),
            managers = subordinates.len(),
            "Built manager index"
        );

        Self {
            extractor,
            keys,
            subordinates,
        }
    }

    pub fn keys(&self) -> &HierarchyKeys {
        &self.keys
    }

    /// Direct reports of `dn`
    pub fn direct_reports(&self, dn: &str) -> &[&'a str] {
        self.subordinates.get(dn).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Entries whose name matches, in snapshot order
    pub fn seeds(&self, pattern: &NamePattern) -> Vec<&'a str> {
        self.extractor
            .index()
            .dns()
            .filter(|dn| {
                let name = self.extractor.extract(dn, &self.keys.name_property);
                pattern.matches(name.as_deref())
            })
            .collect()
    }

    /// Breadth-first descent from one seed
    ///
    /// Each node is recorded once, at the smallest distance it is reached.
    /// Nodes at `max_distance` are recorded but not expanded.
    pub fn descend(&self, seed: &'a str, max_distance: Option<usize>) -> Vec<(&'a str, usize)> {
        let mut visited = HashSet::from([seed]);
        let mut queue = VecDeque::from([(seed, 0usize)]);
        let mut found = Vec::new();

        while let Some((dn, distance)) = queue.pop_front() {
            found.push((dn, distance));
            if max_distance.is_some_and(|max| distance >= max) {
                continue;
            }
            for &report in self.direct_reports(dn) {
                if visited.insert(report) {
                    queue.push_back((report, distance + 1));
                } else {
                    tracing::debug!(dn = report, seed, "Already visited, skipping");
                }
            }
        }

        found
    }

    /// Upward walk from one seed along the manager chain
    ///
    /// Stops when the manager is unset, not in the snapshot, or already on
    /// the path.
    pub fn ascend(&self, seed: &'a str) -> Vec<(&'a str, usize)> {
        let mut visited = HashSet::from([seed]);
        let mut found = vec![(seed, 0usize)];
        let mut current = seed;

        while let Some(manager) = self.extractor.extract(current, &self.keys.manager_property) {
            let Some(manager) = self.extractor.index().resolve(&manager) else {
                tracing::debug!(dn = current, %manager, "Manager not in snapshot");
                break;
            };
            if !visited.insert(manager) {
                tracing::warn!(dn = current, manager, seed, "Manager chain loops back");
                break;
            }
            found.push((manager, found.len()));
            current = manager;
        }

        found
    }

    /// Everyone under the entries named by `pattern`
    ///
    /// Rows closer than `min_distance` are dropped. Each seed is walked on
    /// its own, so a DN under two matching seeds appears once per seed.
    pub fn subordinate_tree(
        &self,
        pattern: &str,
        max_distance: Option<usize>,
        min_distance: usize,
        properties: &[String],
    ) -> Result<Vec<Record>, TraversalError> {
        let pattern = NamePattern::new(pattern)?;
        let seeds = self.seeds(&pattern);
        tracing::debug!(seeds = seeds.len(), ?max_distance, min_distance, "Subordinate walk");

        let found = seeds
            .into_iter()
            .flat_map(|seed| self.descend(seed, max_distance))
            .filter(|(_, distance)| *distance >= min_distance)
            .collect();

        Ok(self.rows(found, properties))
    }

    /// The management chain above the entries named by `pattern`
    pub fn root_path(&self, pattern: &str, properties: &[String]) -> Result<Vec<Record>, TraversalError> {
        let pattern = NamePattern::new(pattern)?;
        let seeds = self.seeds(&pattern);
        tracing::debug!(seeds = seeds.len(), "Root path walk");

        let found = seeds.into_iter().flat_map(|seed| self.ascend(seed)).collect();
        Ok(self.rows(found, properties))
    }

    fn rows(&self, mut found: Vec<(&'a str, usize)>, properties: &[String]) -> Vec<Record> {
        found.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        found
            .into_iter()
            .map(|(dn, distance)| {
                let mut row = Record::with_capacity(properties.len() + 1);
                row.insert("distance".to_string(), Value::from(distance));
                row.extend(self.extractor.select(dn, properties));
                row
            })
            .collect()
    }
}

/// One row per entry, sorted by DN
pub fn list_entries(extractor: &HierarchyExtractor<'_>, properties: &[String]) -> Vec<Record> {
    let mut dns: Vec<&str> = extractor.index().dns().collect();
    dns.sort_unstable();
    dns.into_iter().map(|dn| extractor.select(dn, properties)).collect()
}
