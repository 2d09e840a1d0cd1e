//! Centralized path management for memewall
//! This module provides a single source of truth for all application paths

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "memewall";

/// Get the memewall config directory
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join(APP_DIR);

    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("creating config directory at {}", config_dir.display()))?;

    Ok(config_dir)
}

/// Get the memewall data directory
pub fn data_dir() -> Result<PathBuf> {
    let data_dir = data_base(dirs::data_dir(), dirs::home_dir())
        .context("Unable to determine user data directory")?
        .join(APP_DIR);

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory at {}", data_dir.display()))?;

    Ok(data_dir)
}

/// The platform data directory, or `~/.local/share` spelled out from the home directory
fn data_base(data_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    data_dir.or_else(|| home_dir.map(|home| home.join(".local").join("share")))
}

/// Directory holding downloaded memes and rendered wallpapers
pub fn cache_dir() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR);

    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("creating cache directory at {}", cache_dir.display()))?;

    Ok(cache_dir)
}

pub fn default_settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.json"))
}

pub fn default_history_file() -> Result<PathBuf> {
    Ok(data_dir()?.join("meme_history.json"))
}
