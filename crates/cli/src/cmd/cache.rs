//! Inspect or clear the diff cache

use crate::session::Session;
use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;

pub async fn stats(session: &Session) -> Result<()> {
    let cache = session.cache();
    let stats = cache.stats().context("Failed to read cache directory")?;

    println!("{}", "Diff Cache".bold());
    println!("Location: {}", cache.dir().display().to_string().cyan());
    println!("Entries:  {}", stats.entries.to_string().yellow());
    println!("Size:     {}", util::format_size(stats.total_bytes).yellow());
    Ok(())
}

pub async fn clear(session: &Session) -> Result<()> {
    let cache = session.cache();
    let removed = cache.clear().context("Failed to clear cache")?;

    if removed == 0 {
        println!("{}", "Cache is already empty".dimmed());
    } else {
        println!("{} Removed {} cached results", "✓".green(), removed);
    }
    Ok(())
}
