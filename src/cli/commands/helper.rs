use std::env;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{CONFIG_FILE_NAME, Config, load_config};

/// Load `.poctlrc.json` from the working directory or one of its parents,
/// falling back to the defaults.
pub fn load_project_config() -> Result<Config> {
    let cwd = env::current_dir().context("Failed to resolve the working directory")?;
    let loaded = load_config(&cwd)?;
    if !loaded.from_file {
        debug!("no {} found, using defaults", CONFIG_FILE_NAME);
    }
    Ok(loaded.config)
}
