//! CLI command execution helpers
//!
//! This module provides a wrapper around the `jule` binary that isolates
//! it from the user's config and cache directories and provides convenient
//! assertion methods.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// CLI command builder
pub struct JuleCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl JuleCommand {
    /// Create a new command in the given working directory
    ///
    /// HOME and the XDG directories point inside the working directory so
    /// no user configuration leaks into the test.
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        let working_dir = working_dir.as_ref().to_path_buf();
        let home = working_dir.join(".home");

        let mut env = HashMap::new();
        env.insert("HOME".to_string(), home.display().to_string());
        env.insert("XDG_CONFIG_HOME".to_string(), home.join("config").display().to_string());
        env.insert("XDG_CACHE_HOME".to_string(), home.join("cache").display().to_string());

        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_jule")),
            working_dir,
            args: Vec::new(),
            env,
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Execute command and capture its output
    pub fn execute(&self) -> Result<CommandResult> {
        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env_remove("RUST_LOG")
            .envs(&self.env)
            .output()
            .context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse stdout as JSON lines
    pub fn json_rows(&self) -> Result<Vec<serde_json::Value>> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).with_context(|| format!("Not JSON: {line}")))
            .collect()
    }
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// jule!(dir, "snapshots", "--format", "jsonl").assert_success()?;
/// ```
#[macro_export]
macro_rules! jule {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::JuleCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rows_skips_blank_lines() {
        let result = CommandResult {
            stdout: "{\"dn\":\"u1\"}\n\n{\"dn\":\"u2\"}\n".to_string(),
            stderr: String::new(),
            exit_code: 0,
        };

        let rows = result.json_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["dn"], "u2");
    }
}
