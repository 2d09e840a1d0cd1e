use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::meme::SubredditTarget;

pub const DEFAULT_API_URL: &str = "https://meme-api.com/gimme";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_history must be greater than zero")]
    ZeroHistory,

    #[error("max_attempts must be greater than zero")]
    ZeroAttempts,

    #[error("request_timeout_secs must be greater than zero")]
    ZeroTimeout,
}

fn default_font_name() -> String {
    "arial.ttf".to_string()
}

fn default_font_size() -> u32 {
    40
}

fn default_bottom_strip_height() -> u32 {
    50
}

fn default_max_history() -> usize {
    100
}

fn default_max_attempts() -> usize {
    25
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_subreddits() -> Vec<Option<String>> {
    let mut subreddits = vec![None];
    subreddits.extend(
        [
            "programmingmemes",
            "ProgrammerHumor",
            "lotrmemes",
            "MEOW_IRL",
            "YouSeeComrade",
            "DunderMifflin",
            "workmemes",
        ]
        .into_iter()
        .map(|name| Some(name.to_string())),
    );
    subreddits
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FontConfig {
    #[serde(default = "default_font_name")]
    pub name: String,
    #[serde(default = "default_font_size")]
    pub size: u32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            name: default_font_name(),
            size: default_font_size(),
        }
    }
}

/// User settings, loaded once per run and passed around by reference.
///
/// Every key falls back to its own default, so a settings file only needs
/// to mention what it changes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MemeConfig {
    #[serde(default)]
    pub font: FontConfig,
    #[serde(default = "default_bottom_strip_height")]
    pub bottom_strip_height: u32,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
    /// `null` entries let the API pick any subreddit
    #[serde(default = "default_subreddits")]
    pub subreddits: Vec<Option<String>>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_image: Option<PathBuf>,
}

impl Default for MemeConfig {
    fn default() -> Self {
        Self {
            font: FontConfig::default(),
            bottom_strip_height: default_bottom_strip_height(),
            max_history: default_max_history(),
            subreddits: default_subreddits(),
            max_attempts: default_max_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
            api_url: default_api_url(),
            fallback_image: None,
        }
    }
}

impl MemeConfig {
    /// Load settings from `path`, using defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let s = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("loading settings {}", path.display()))
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).context("parsing settings json")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("creating settings directory")?;
        }

        let json = serde_json::to_string_pretty(self).context("serializing settings to json")?;
        fs::write(path, json + "\n")
            .with_context(|| format!("writing settings {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// The sampling pool for the selector. An empty list means "any subreddit".
    pub fn targets(&self) -> Vec<SubredditTarget> {
        if self.subreddits.is_empty() {
            return vec![SubredditTarget::Any];
        }
        self.subreddits
            .iter()
            .map(|entry| SubredditTarget::from(entry.as_deref()))
            .collect()
    }
}
