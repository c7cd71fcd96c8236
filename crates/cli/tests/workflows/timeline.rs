//! Timeline and changes over a data directory

use crate::common::fixtures::{DAY, DAY_ONE};
use crate::common::TestProject;
use crate::jule;
use anyhow::Result;

#[test]
fn test_membership_timeline() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();
    let cache_dir = project.root().join("cache");

    let run = || {
        jule!(
            project.root(),
            "--data-dir", data_dir.to_str().unwrap(),
            "--cache-dir", cache_dir.to_str().unwrap(),
            "--format", "jsonl",
            "timeline"
        )
        .assert_success()
    };

    let first = run()?;
    let rows = first.json_rows()?;
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["action"], "added");
    assert_eq!(row["dn"], "u3");
    assert_eq!(row["full_name"], "Carol");
    assert_eq!(row["manager_name"], "Alice");
    assert!(row["bucket_key"].is_string());
    // department is empty everywhere and dropped
    assert!(row.get("department").is_none());

    // Cached result is identical
    let second = run()?;
    assert_eq!(second.json_rows()?, rows);
    assert_eq!(std::fs::read_dir(&cache_dir)?.count(), 1);
    Ok(())
}

#[test]
fn test_changes_timeline() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();
    let cache_dir = project.root().join("cache");

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "--cache-dir", cache_dir.to_str().unwrap(),
        "--format", "jsonl",
        "changes"
    )
    .assert_success()?;

    let rows = result.json_rows()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["dn"], "u2");
    assert_eq!(rows[0]["title"], "Senior Engineer");
    assert_eq!(rows[0]["old_title"], "Engineer");
    assert_eq!(rows[0]["updated_props"], "title");
    assert_eq!(rows[0]["path"], "day2.jule");
    assert_eq!(rows[0]["baseline_path"], "day1.jule");
    Ok(())
}

#[test]
fn test_changes_paths_follow_data_dir_with_shared_cache() -> Result<()> {
    let project = TestProject::org_chart()?;
    let cache_dir = project.root().join("cache");
    let changes = |data_dir: &std::path::Path| -> Result<Vec<serde_json::Value>> {
        jule!(
            project.root(),
            "--data-dir", data_dir.to_str().unwrap(),
            "--cache-dir", cache_dir.to_str().unwrap(),
            "--format", "jsonl",
            "changes"
        )
        .assert_success()?
        .json_rows()
    };

    // Same containers seen from the project root, then from data/
    let from_root = changes(project.root())?;
    assert_eq!(from_root[0]["path"], "data/day2.jule");

    let from_data = changes(&project.data_dir())?;
    assert_eq!(from_data[0]["path"], "day2.jule");
    assert_eq!(from_data[0]["baseline_path"], "day1.jule");
    Ok(())
}

#[test]
fn test_label_filter_and_junk_files() -> Result<()> {
    let project = TestProject::org_chart()?;
    project.write("other.jule", "other", DAY_ONE + 2.0 * DAY, &[])?;
    std::fs::write(project.data_dir().join("README.txt"), b"notes")?;
    std::fs::write(project.data_dir().join("corrupt.jule"), b"JULE\x01\x00\x02\x00\xff")?;
    let data_dir = project.data_dir();
    let cache_dir = project.root().join("cache");

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "--cache-dir", cache_dir.to_str().unwrap(),
        "--format", "jsonl",
        "timeline", "--label", "org"
    )
    .assert_success()?;
    assert_eq!(result.json_rows()?.len(), 1);

    let listed = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "--format", "jsonl",
        "snapshots"
    )
    .assert_success()?;
    let files: Vec<_> = listed
        .json_rows()?
        .iter()
        .map(|r| r["file"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(files, vec!["day1.jule", "day2.jule", "other.jule"]);
    Ok(())
}

#[test]
fn test_sample_then_timeline() -> Result<()> {
    let project = TestProject::new()?;
    let data_dir = project.data_dir();
    let cache_dir = project.root().join("cache");

    jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "sample", "--days", "3", "--seed", "11"
    )
    .assert_success()?;

    let snapshots = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "--format", "jsonl",
        "snapshots", "--label", "sample"
    )
    .assert_success()?;
    assert_eq!(snapshots.json_rows()?.len(), 3);

    let timeline = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "--cache-dir", cache_dir.to_str().unwrap(),
        "--format", "jsonl",
        "timeline"
    )
    .assert_success()?;
    let rows = timeline.json_rows()?;
    // Every later day hires at least one person
    assert!(rows.iter().filter(|r| r["action"] == "added").count() >= 2);
    Ok(())
}
