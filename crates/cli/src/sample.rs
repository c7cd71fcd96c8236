//! Synthetic snapshot series for demos and tests
//!
//! Day 0 hires a random staff; each following day hires a few more,
//! occasionally retitles people and lets a few leave. Output is fully
//! determined by the seed and the start time.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use jule_core::container::save_to_path;
use jule_core::store::snapshot_file_name;
use jule_core::{Entry, SnapshotData, SnapshotMetadata, SnapshotParameters, StorageContainer};
use jule_hierarchy::Plugin;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

const FIRST_NAMES: [&str; 12] = [
    "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy", "Mallory", "Niaj",
];
const LAST_NAMES: [&str; 8] = ["Smith", "Jones", "Garcia", "Chen", "Okafor", "Novak", "Silva", "Kim"];
const TITLES: [&str; 3] = ["Software Engineer", "QA Engineer", "Engineering Manager"];
const DEPARTMENTS: [&str; 3] = ["Core Tech", "R&D", "Support"];
const COMPANIES: [&str; 3] = ["Example Corp", "Example Labs", "Example Services"];

const RETITLE_CHANCE: f64 = 0.1;
const LEAVE_CHANCE: f64 = 0.03;

pub const DAY_SECS: f64 = 86_400.0;

pub struct SampleOptions {
    pub days: u32,
    pub seed: u64,
    /// Capture time of day 0
    pub start: f64,
}

struct Generator<'a> {
    rng: ChaCha8Rng,
    entries: IndexMap<String, Entry>,
    base_dn: &'a str,
}

impl Generator<'_> {
    fn hire(&mut self) {
        let uid = format!("{:016x}", self.rng.gen::<u64>());
        let dn = format!("uid={uid},{}", self.base_dn);

        let first = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("Anon");
        let last = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Person");
        let mut entry = Entry::new()
            .with_text("displayName", &format!("{first} {last}"))
            .with_text("title", self.pick(&TITLES))
            .with_text("department", self.pick(&DEPARTMENTS))
            .with_text("company", self.pick(&COMPANIES));

        if !self.entries.is_empty() {
            let index = self.rng.gen_range(0..self.entries.len());
            if let Some((manager, _)) = self.entries.get_index(index) {
                entry = entry.with_text("manager", manager);
            }
        }
        self.entries.insert(dn, entry);
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn churn(&mut self) {
        let dns: Vec<String> = self.entries.keys().cloned().collect();
        for dn in dns {
            if self.rng.gen_bool(LEAVE_CHANCE) {
                self.entries.shift_remove(&dn);
                continue;
            }
            if self.rng.gen_bool(RETITLE_CHANCE) {
                let title = self.pick(&TITLES);
                if let Some(entry) = self.entries.get_mut(&dn) {
                    *entry = entry.clone().with_text("title", title);
                }
            }
        }
    }

    fn snapshot(&self) -> SnapshotData {
        SnapshotData::new(
            self.entries
                .iter()
                .map(|(dn, entry)| (dn.clone(), entry.clone()))
                .collect(),
        )
    }
}

/// Write one snapshot per day into `out_dir`; returns the written paths
pub fn generate(out_dir: &Path, plugin: &dyn Plugin, options: &SampleOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let query_set = plugin
        .query_sets()
        .into_iter()
        .next()
        .context("Plugin declares no query sets")?;
    let base_dn = query_set
        .queries
        .first()
        .map(|query| query.root_dn.clone())
        .context("Query set has no search roots")?;

    let mut generator = Generator {
        rng: ChaCha8Rng::seed_from_u64(options.seed),
        entries: IndexMap::new(),
        base_dn: &base_dn,
    };

    let mut written = Vec::with_capacity(options.days as usize);
    for day in 0..options.days {
        if day == 0 {
            let staff = generator.rng.gen_range(30..=100);
            (0..staff).for_each(|_| generator.hire());
        } else {
            let hires = generator.rng.gen_range(1..=10);
            (0..hires).for_each(|_| generator.hire());
            generator.churn();
        }

        let timestamp = options.start + DAY_SECS * f64::from(day);
        let parameters = SnapshotParameters {
            root_dns: query_set.queries.iter().map(|q| q.root_dn.clone()).collect(),
            attributes: query_set.attributes.clone(),
            plugin_name: Some(plugin.name().to_string()),
            ..Default::default()
        };
        let metadata = SnapshotMetadata::at(timestamp)
            .with_label(query_set.label.clone())
            .with_parameters(parameters);

        let captured: DateTime<Local> = metadata
            .datetime()
            .context("Start time out of range")?
            .with_timezone(&Local);
        let path = out_dir.join(snapshot_file_name(&query_set.label, &captured));

        let container = StorageContainer::new(generator.snapshot(), metadata);
        save_to_path(&container, &path).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = generator.entries.len(), day, "Sample snapshot written");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jule_core::container::load_from_path;
    use jule_hierarchy::SamplePlugin;

    fn options(seed: u64) -> SampleOptions {
        SampleOptions {
            days: 3,
            seed,
            start: 1_700_000_000.0,
        }
    }

    #[test]
    fn test_generates_one_file_per_day() -> anyhow::Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let paths = generate(temp_dir.path(), &SamplePlugin, &options(7))?;
        assert_eq!(paths.len(), 3);

        let first = load_from_path(&paths[0], true)?;
        let data = first.data.unwrap();
        assert!((30..=100).contains(&data.len()));
        assert_eq!(first.metadata.label.as_deref(), Some("sample"));
        assert_eq!(first.metadata.entries_count, Some(data.len() as u64));

        let last = load_from_path(&paths[2], false)?;
        assert_eq!(last.metadata.timestamp, 1_700_000_000.0 + 2.0 * DAY_SECS);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_data() -> anyhow::Result<()> {
        let a = tempfile::tempdir()?;
        let b = tempfile::tempdir()?;
        let left = generate(a.path(), &SamplePlugin, &options(42))?;
        let right = generate(b.path(), &SamplePlugin, &options(42))?;

        for (l, r) in left.iter().zip(&right) {
            assert_eq!(load_from_path(l, true)?.data, load_from_path(r, true)?.data);
        }
        Ok(())
    }
}
