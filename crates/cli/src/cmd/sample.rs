//! Generate synthetic snapshots

use crate::sample::{generate, SampleOptions};
use crate::session::Session;
use anyhow::Result;
use jule_core::snapshot::current_timestamp;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub async fn run(session: &Session, out: Option<PathBuf>, days: u32, seed: Option<u64>) -> Result<()> {
    let out_dir = match out {
        Some(dir) => dir,
        None => session.data_dir()?,
    };
    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!(seed, days, out = %out_dir.display(), "Generating sample snapshots");

    let options = SampleOptions {
        days,
        seed,
        start: current_timestamp(),
    };
    let written = generate(&out_dir, session.plugin.as_ref(), &options)?;

    for path in &written {
        println!("{} {}", "✓".green(), path.display());
    }
    println!(
        "{}",
        format!("Wrote {} snapshots (seed {})", written.len(), seed).dimmed()
    );
    Ok(())
}
