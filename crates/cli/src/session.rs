//! Per-run state shared by every command

use crate::config::JuleConfig;
use crate::output::{write_records, OutputFormat};
use anyhow::{Context, Result};
use jule_core::record::order_by;
use jule_core::{CacheStore, Record};
use jule_hierarchy::{Plugin, PluginRegistry};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Dispatch;

pub struct Session {
    pub config: JuleConfig,
    /// Config file actually read, if any
    pub config_path: Option<PathBuf>,
    pub registry: PluginRegistry,
    pub plugin: Arc<dyn Plugin>,
    pub format: OutputFormat,
    pub order_by: Vec<String>,
    /// Logging handle for worker threads
    pub dispatch: Dispatch,
    color: bool,
}

impl Session {
    pub fn new(
        config: JuleConfig,
        config_path: Option<PathBuf>,
        format: Option<OutputFormat>,
        order_by: Vec<String>,
        dispatch: Dispatch,
    ) -> Result<Self> {
        let registry = PluginRegistry::with_builtin();
        let plugin = registry.get(&config.plugin)?;
        let is_terminal = std::io::stdout().is_terminal();
        let format = OutputFormat::resolve(format, config.default_format, is_terminal);

        Ok(Self {
            config,
            config_path,
            registry,
            plugin,
            format,
            order_by,
            dispatch,
            color: is_terminal,
        })
    }

    pub fn cache(&self) -> CacheStore {
        CacheStore::new(&self.config.cache_dir)
    }

    /// Data directory as an absolute path
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = &self.config.data_dir;
        if data_dir.is_absolute() {
            return Ok(data_dir.clone());
        }
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(cwd.join(data_dir))
    }

    /// Apply `--order-by` and print rows to stdout
    pub fn emit(&self, rows: Vec<Record>) -> Result<()> {
        let rows = if self.order_by.is_empty() || rows.is_empty() {
            rows
        } else {
            order_by(rows, &self.order_by)?
        };
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        write_records(&mut out, &rows, self.format, self.color)
    }
}
