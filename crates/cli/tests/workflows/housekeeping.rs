//! Cache, config and plugin commands

use crate::common::TestProject;
use crate::jule;
use anyhow::Result;

#[test]
fn test_cache_stats_and_clear() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();
    let cache_dir = project.root().join("cache");
    let dirs = [
        "--data-dir", data_dir.to_str().unwrap(),
        "--cache-dir", cache_dir.to_str().unwrap(),
    ];

    jule!(project.root(), dirs[0], dirs[1], dirs[2], dirs[3], "--format", "jsonl", "timeline").assert_success()?;
    jule!(project.root(), dirs[0], dirs[1], dirs[2], dirs[3], "--format", "jsonl", "changes").assert_success()?;

    let stats = jule!(project.root(), dirs[0], dirs[1], dirs[2], dirs[3], "cache", "stats").assert_success()?;
    let entries = stats.stdout.lines().find(|l| l.starts_with("Entries:")).unwrap_or_default();
    assert!(entries.contains('2'));

    let cleared = jule!(project.root(), dirs[0], dirs[1], dirs[2], dirs[3], "cache", "clear").assert_success()?;
    assert!(cleared.stdout.contains("Removed 2 cached results"));
    assert_eq!(std::fs::read_dir(&cache_dir)?.count(), 0);
    Ok(())
}

#[test]
fn test_config_file_is_honoured() -> Result<()> {
    let project = TestProject::org_chart()?;
    let config_path = project.root().join("jule.toml");
    std::fs::write(
        &config_path,
        format!(
            "data_dir = {:?}\ndefault_format = \"csv\"\n",
            project.data_dir().display().to_string()
        ),
    )?;

    let result = jule!(
        project.root(),
        "--config", config_path.to_str().unwrap(),
        "list", "day1.jule", "--select", "dn,title"
    )
    .assert_success()?;
    let lines: Vec<_> = result.stdout.lines().collect();
    assert_eq!(lines, vec!["dn,title", "u1,CTO", "u2,Engineer"]);

    let shown = jule!(project.root(), "--config", config_path.to_str().unwrap(), "config", "show").assert_success()?;
    assert!(shown.stdout.contains("default_format = \"csv\""));
    Ok(())
}

#[test]
fn test_bad_config_and_plugin_fail() -> Result<()> {
    let project = TestProject::new()?;
    let config_path = project.root().join("bad.toml");
    std::fs::write(&config_path, "log_level = \"shouting\"\n")?;

    let result = jule!(project.root(), "--config", config_path.to_str().unwrap(), "plugins").assert_failure()?;
    assert!(result.contains_stderr("log_level"));

    let result = jule!(project.root(), "--plugin", "acme", "plugins").assert_failure()?;
    assert!(result.contains_stderr("unknown plugin 'acme'"));

    let missing = project.root().join("missing.toml");
    jule!(project.root(), "--config", missing.to_str().unwrap(), "plugins").assert_failure()?;
    Ok(())
}

#[test]
fn test_plugins_lists_sample() -> Result<()> {
    let project = TestProject::new()?;
    let result = jule!(project.root(), "--format", "jsonl", "plugins").assert_success()?;

    let rows = result.json_rows()?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "sample");
    assert_eq!(rows[0]["active"], "yes");
    Ok(())
}

#[test]
fn test_non_terminal_defaults_to_jsonl() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let result = jule!(
        project.root(),
        "--data-dir", data_dir.to_str().unwrap(),
        "list", "day1.jule", "--select", "dn"
    )
    .assert_success()?;
    assert_eq!(result.json_rows()?.len(), 2);
    assert!(result.contains_stderr("not a terminal"));
    Ok(())
}

#[test]
fn test_rust_log_overrides_configured_level() -> Result<()> {
    let project = TestProject::org_chart()?;
    let data_dir = project.data_dir();

    let quiet = jule!(project.root(), "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl", "plugins")
        .assert_success()?;
    assert!(!quiet.contains_stderr("Configuration loaded"));

    let verbose = jule!(project.root(), "--data-dir", data_dir.to_str().unwrap(), "--format", "jsonl", "plugins")
        .env("RUST_LOG", "debug")
        .assert_success()?;
    assert!(verbose.contains_stderr("Configuration loaded"));
    Ok(())
}
