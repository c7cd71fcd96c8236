//! Snapshot fixtures written with the real container codec

use anyhow::Result;
use jule_core::container::save_to_path;
use jule_core::{Entry, SnapshotData, SnapshotMetadata, StorageContainer};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const DAY: f64 = 86_400.0;
/// 2023-11-14 12:00:00 UTC; the same calendar day in every common time zone
pub const DAY_ONE: f64 = 1_699_963_200.0;

/// A person: (dn, display name, manager dn, title)
pub type Person<'a> = (&'a str, &'a str, Option<&'a str>, &'a str);

pub fn snapshot(people: &[Person<'_>]) -> SnapshotData {
    SnapshotData::new(
        people
            .iter()
            .map(|(dn, name, manager, title)| {
                let mut entry = Entry::new().with_text("displayName", name).with_text("title", title);
                if let Some(manager) = manager {
                    entry = entry.with_text("manager", manager);
                }
                (dn.to_string(), entry)
            })
            .collect(),
    )
}

/// Temporary workspace with a `data/` directory
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("data"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root().join("data")
    }

    pub fn write(&self, file: &str, label: &str, timestamp: f64, people: &[Person<'_>]) -> Result<PathBuf> {
        let path = self.data_dir().join(file);
        let metadata = SnapshotMetadata::at(timestamp).with_label(label);
        save_to_path(&StorageContainer::new(snapshot(people), metadata), &path)?;
        Ok(path)
    }

    /// Day one: Alice and Bob. Day two: Carol joins, Bob is promoted.
    pub fn org_chart() -> Result<Self> {
        let project = Self::new()?;
        project.write(
            "day1.jule",
            "org",
            DAY_ONE,
            &[
                ("u1", "Alice", None, "CTO"),
                ("u2", "Bob", Some("u1"), "Engineer"),
            ],
        )?;
        project.write(
            "day2.jule",
            "org",
            DAY_ONE + DAY,
            &[
                ("u1", "Alice", None, "CTO"),
                ("u2", "Bob", Some("u1"), "Senior Engineer"),
                ("u3", "Carol", Some("u1"), "Engineer"),
            ],
        )?;
        Ok(project)
    }
}
