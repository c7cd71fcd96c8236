//! User configuration (`<config_dir>/jule/config.toml`)
//!
//! Every field is optional in the file; missing fields take their defaults
//! and command-line flags override whatever the file says.

use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JuleConfig {
    /// Directory holding snapshot containers
    pub data_dir: PathBuf,
    /// Directory for cached diff results
    pub cache_dir: PathBuf,
    /// Deployment plugin name
    pub plugin: String,
    /// Log level when neither `RUST_LOG` nor `-v` is given
    pub log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<OutputFormat>,
}

impl Default for JuleConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_dir: dirs::cache_dir()
                .map(|dir| dir.join("jule"))
                .unwrap_or_else(|| PathBuf::from(".jule-cache")),
            plugin: "sample".to_string(),
            log_level: "warn".to_string(),
            default_format: None,
        }
    }
}

impl JuleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plugin.trim().is_empty() {
            return Err(ConfigError::Invalid("plugin name must not be empty".to_string()));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Ok(())
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Default location of the config file
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("jule").join("config.toml"))
}

/// Load the configuration
///
/// An explicit path must exist. The default path may be missing, in which
/// case defaults apply. Returns the file actually read, if any.
pub fn load(explicit: Option<&Path>) -> Result<(JuleConfig, Option<PathBuf>), ConfigError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match config_file_path() {
            Some(path) => (path, false),
            None => return Ok((JuleConfig::default(), None)),
        },
    };

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            return Ok((JuleConfig::default(), None));
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let config = JuleConfig::from_toml(&text, &path)?;
    Ok((config, Some(path)))
}

/// Commented example file showing every key at its default
pub fn example_config() -> String {
    let defaults = JuleConfig::default();
    format!(
        "# jule configuration\n\
         # data_dir: directory scanned for snapshot containers\n\
         data_dir = {:?}\n\
         # cache_dir: cached diff results\n\
         cache_dir = {:?}\n\
         # plugin: deployment plugin ('jule plugins' lists them)\n\
         plugin = {:?}\n\
         # log_level: trace, debug, info, warn or error\n\
         log_level = {:?}\n\
         # default_format: table, csv, json or jsonl\n\
         # default_format = \"table\"\n",
        defaults.data_dir.display().to_string(),
        defaults.cache_dir.display().to_string(),
        defaults.plugin,
        defaults.log_level,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let config = JuleConfig::from_toml("plugin = \"sample\"\ndefault_format = \"csv\"\n", Path::new("c.toml"))?;
        assert_eq!(config.default_format, Some(OutputFormat::Csv));
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.log_level, "warn");
        Ok(())
    }

    #[test]
    fn test_rejects_bad_values() {
        let path = Path::new("c.toml");
        assert!(matches!(
            JuleConfig::from_toml("plugin = \"  \"", path),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            JuleConfig::from_toml("log_level = \"loud\"", path),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            JuleConfig::from_toml("default_format = \"xml\"", path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            JuleConfig::from_toml("colour = true", path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_path_must_exist() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let missing = temp_dir.path().join("nope.toml");
        assert!(matches!(load(Some(&missing)), Err(ConfigError::Read { .. })));

        let present = temp_dir.path().join("jule.toml");
        std::fs::write(&present, "data_dir = \"/srv/snapshots\"\n")?;
        let (config, used) = load(Some(&present))?;
        assert_eq!(config.data_dir, PathBuf::from("/srv/snapshots"));
        assert_eq!(used, Some(present));
        Ok(())
    }

    #[test]
    fn test_example_parses() -> Result<()> {
        let config = JuleConfig::from_toml(&example_config(), Path::new("example.toml"))?;
        assert_eq!(config, JuleConfig::default());
        Ok(())
    }
}
