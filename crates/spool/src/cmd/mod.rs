//! Command implementations for the spool CLI

pub mod check;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use spool_config::Config;

/// Searched in order when no `--config` is given
const DEFAULT_CONFIG_PATHS: [&str; 2] = ["spool.toml", "configs/spool.toml"];

/// Locate and load the configuration file
///
/// An explicit path must exist. Without one, the default locations are
/// tried; there is no built-in fallback since the upstream URL is required.
pub fn load_config(path: Option<&Path>) -> Result<(PathBuf, Config)> {
    let path = match path {
        Some(path) => {
            if !path.exists() {
                bail!("config file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().map(PathBuf::from).find(|p| p.exists()) {
            Some(path) => path,
            None => bail!(
                "no config file found (looked for {}); pass --config",
                DEFAULT_CONFIG_PATHS.join(", ")
            ),
        },
    };

    let config = Config::from_file(&path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    Ok((path, config))
}
