use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::MemeError;
use crate::config::MemeConfig;

/// Where to ask the Meme API for a meme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubredditTarget {
    /// Let the API choose a subreddit
    Any,
    Named(String),
}

impl From<Option<&str>> for SubredditTarget {
    fn from(entry: Option<&str>) -> Self {
        match entry.map(str::trim) {
            Some(name) if !name.is_empty() => SubredditTarget::Named(name.to_string()),
            _ => SubredditTarget::Any,
        }
    }
}

impl fmt::Display for SubredditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubredditTarget::Any => write!(f, "any"),
            SubredditTarget::Named(name) => write!(f, "r/{}", name),
        }
    }
}

/// One candidate meme. `id` is what the history remembers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeRecord {
    pub id: String,
    pub title: String,
    pub image_url: String,
}

impl MemeRecord {
    pub fn new(title: impl Into<String>, image_url: impl Into<String>) -> Self {
        let image_url = image_url.into();
        Self {
            id: image_url.clone(),
            title: title.into(),
            image_url,
        }
    }
}

pub trait MemeSource {
    fn fetch(&self, target: &SubredditTarget) -> Result<MemeRecord, MemeError>;
}

#[derive(Debug, Deserialize)]
struct ApiMeme {
    title: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Blocking client for <https://github.com/D3vd/Meme_Api>
pub struct MemeApiSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl MemeApiSource {
    pub fn new(config: &MemeConfig) -> Result<Self, MemeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("memewall/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, target: &SubredditTarget) -> String {
        endpoint(&self.base_url, target)
    }
}

impl MemeSource for MemeApiSource {
    fn fetch(&self, target: &SubredditTarget) -> Result<MemeRecord, MemeError> {
        let url = self.endpoint(target);
        tracing::debug!(%url, "requesting meme");

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(MemeError::Transport(format!("HTTP {}: {}", status, message)));
        }

        parse_response(&body)
    }
}

fn endpoint(base_url: &str, target: &SubredditTarget) -> String {
    match target {
        SubredditTarget::Any => base_url.to_string(),
        SubredditTarget::Named(name) => format!("{}/{}", base_url, name),
    }
}

fn parse_response(body: &str) -> Result<MemeRecord, MemeError> {
    let meme: ApiMeme =
        serde_json::from_str(body).map_err(|e| MemeError::InvalidResponse(e.to_string()))?;

    let url = meme
        .url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| MemeError::InvalidResponse("response has no image url".to_string()))?;

    Ok(MemeRecord::new(meme.title.unwrap_or_default(), url))
}
