//! Single-snapshot queries and pairwise diff

use crate::common::TestProject;
use crate::jule;
use anyhow::Result;

#[test]
fn test_list_sorted_by_dn() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();
    let data_dir = data_dir.to_str().unwrap();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir, "--format", "jsonl",
        "list", "day2.jule", "--select", "dn,full_name,manager_name"
    )
    .assert_success()?;

    let rows = result.json_rows()?;
    let dns: Vec<_> = rows.iter().map(|r| r["dn"].as_str().unwrap_or_default()).collect();
    assert_eq!(dns, vec!["u1", "u2", "u3"]);
    assert!(rows[0]["manager_name"].is_null());
    assert_eq!(rows[2]["manager_name"], "Alice");
    Ok(())
}

#[test]
fn test_subordinates_of_alice() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl",
        "subordinates", "day2.jule", "alice", "--select", "dn"
    )
    .assert_success()?;

    let pairs: Vec<(String, i64)> = result
        .json_rows()?
        .iter()
        .map(|r| (r["dn"].as_str().unwrap_or_default().to_string(), r["distance"].as_i64().unwrap_or(-1)))
        .collect();
    assert_eq!(
        pairs,
        vec![("u1".to_string(), 0), ("u2".to_string(), 1), ("u3".to_string(), 1)]
    );
    Ok(())
}

#[test]
fn test_root_path_and_order_by() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl", "--order-by", "full_name",
        "root-path", "day2.jule", "C*", "--select", "dn,full_name"
    )
    .assert_success()?;

    let names: Vec<_> = result
        .json_rows()?
        .iter()
        .map(|r| r["full_name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Alice", "Carol"]);
    Ok(())
}

#[test]
fn test_unknown_order_by_column_fails() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl", "--order-by", "shoe_size",
        "list", "day1.jule", "--select", "dn"
    )
    .assert_failure()?;
    assert!(result.contains_stderr("shoe_size"));
    Ok(())
}

#[test]
fn test_diff_between_named_snapshots() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl",
        "diff", "day2.jule", "day1.jule", "--select", "dn,full_name"
    )
    .assert_success()?;

    let rows = result.json_rows()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["diff"], "added");
    assert_eq!(rows[0]["full_name"], "Carol");
    Ok(())
}

#[test]
fn test_named_snapshot_must_be_valid() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();
    std::fs::write(data_dir.join("broken.jule"), b"definitely not a container")?;

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl",
        "list", "broken.jule"
    )
    .assert_failure()?;
    assert!(result.contains_stderr("broken.jule"));

    jule!(project.root(), "--data-dir", data_dir.to_str().unwrap(), "list", "missing.jule").assert_failure()?;
    Ok(())
}

#[test]
fn test_invalid_pattern_is_reported() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "subordinates", "day1.jule", "["
    )
    .assert_failure()?;
    assert!(result.contains_stderr("invalid name pattern"));
    Ok(())
}
