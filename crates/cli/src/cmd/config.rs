//! Configuration commands

use crate::config::{self, example_config};
use crate::session::Session;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

/// Show the config file path in use (or the default location)
pub async fn run_path(session: &Session) -> Result<()> {
    let config_path = match &session.config_path {
        Some(path) => path.clone(),
        None => config::config_file_path().context("Could not determine config file path")?,
    };

    println!("{}", config_path.display());
    if !config_path.exists() {
        println!("{}", "File does not exist; defaults are in effect.".yellow());
    }
    Ok(())
}

/// Show the effective configuration after flags are applied
pub async fn run_show(session: &Session, example: bool) -> Result<()> {
    if example {
        print!("{}", example_config());
        return Ok(());
    }

    let rendered = toml::to_string_pretty(&session.config).context("Failed to render configuration")?;
    if let Some(path) = &session.config_path {
        println!("{}", format!("# from {}", path.display()).dimmed());
    }
    print!("{rendered}");
    Ok(())
}
