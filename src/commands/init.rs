use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::starter_config;
use crate::{CONFIG_FILE, DATA_DIR, DAYPLAN_DIR};

/// Creates `.dayplan/` in the current directory with a starter config
/// and an empty data directory. Safe to re-run.
pub fn run() -> Result<()> {
    let dayplan_dir = PathBuf::from(DAYPLAN_DIR);

    if dayplan_dir.exists() {
        println!("Dayplan already initialized in {}", dayplan_dir.display());
        return Ok(());
    }

    fs::create_dir_all(dayplan_dir.join(DATA_DIR))
        .context("Failed to create .dayplan directory")?;

    let config_path = dayplan_dir.join(CONFIG_FILE);
    fs::write(&config_path, starter_config())
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Initialized dayplan in {}", dayplan_dir.display());
    println!("Edit {} to set your job categories.", config_path.display());
    Ok(())
}
