//! tally library - Turn cucumber JSON reports into a static report site
//!
//! This library exposes the pieces of the tally CLI for testing
//! and embedding purposes.

pub mod config;
pub mod output;
pub mod site;

use config::Config;
use eyre::{Result, WrapErr};
use std::path::{Path, PathBuf};
use tally_core::{LoadResult, Sources, WalkSources};

/// Directory marking a project root
pub const CONFIG_DIR: &str = ".config/tally";

/// Default config location, relative to the project root
pub const CONFIG_PATH: &str = ".config/tally/config.yaml";

/// Directory that holds the tally config or the git checkout, searching up
/// from the current directory. Falls back to the current directory.
pub fn find_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().wrap_err("Failed to get current directory")?;
    Ok(find_project_root_from(&cwd))
}

/// Same as [`find_project_root`], starting from `start`
pub fn find_project_root_from(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_DIR).is_dir() || dir.join(".git").exists())
        .unwrap_or(start)
        .to_path_buf()
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        eyre::bail!(
            "Config file not found at {}\n\n\
             Create a config file with your report configuration:\n\n\
             title: \"My Project\"\n\
             source: \"target/cucumber\"\n\
             output: \"target/report\"",
            path.display()
        );
    }

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Load config if it exists, otherwise return the default config.
///
/// A config file that exists but does not parse is still an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config(path)
}

/// Walk `source` for report files using the config's include/exclude patterns
pub fn load_reports(source: &Path, config: &Config) -> Result<LoadResult> {
    WalkSources::new(source)
        .include(config.include.iter().cloned())
        .exclude(config.exclude.iter().cloned())
        .load()
        .wrap_err_with(|| format!("Failed to load reports from {}", source.display()))
}
