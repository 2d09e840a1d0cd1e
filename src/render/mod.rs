//! Turns a meme (or the fallback) into a screen-sized wallpaper file.
//!
//! All image work is delegated to ImageMagick.

pub mod compose;
pub mod magick;
pub mod resolution;

use colored::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::common::process::ProcessError;
use crate::config::MemeConfig;
use crate::meme::MemeRecord;
use compose::Caption;
use magick::{identify, run_magick};
pub use resolution::Resolution;

const FALLBACK_MESSAGE: &str = "No fresh meme today";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp"];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("ImageMagick failed: {0}")]
    Tool(#[from] ProcessError),

    #[error("Unexpected ImageMagick output: {0}")]
    UnexpectedOutput(String),

    #[error("Could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fallback image {} does not exist", .0.display())]
    FallbackMissing(PathBuf),
}

pub struct Renderer<'a> {
    config: &'a MemeConfig,
    work_dir: PathBuf,
    screen: Resolution,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a MemeConfig, work_dir: impl Into<PathBuf>, screen: Resolution) -> Self {
        Self {
            config,
            work_dir: work_dir.into(),
            screen,
        }
    }

    /// Download the meme, add its title and fit it to the screen
    pub fn prepare_meme(&self, meme: &MemeRecord) -> Result<PathBuf, RenderError> {
        println!("{}", "Downloading meme...".cyan());
        let downloaded = self.fetch_image(&meme.image_url)?;
        self.compose_meme(&downloaded, meme)
    }

    /// Title and fit an already downloaded meme. The intermediate files are
    /// removed whether or not rendering succeeds.
    fn compose_meme(&self, downloaded: &Path, meme: &MemeRecord) -> Result<PathBuf, RenderError> {
        println!("{}", "Adding title...".cyan());
        let composed = self.work_dir.join("composed.png");

        let result = self
            .add_title(downloaded, &meme.title, &composed)
            .and_then(|()| {
                let out = self.output_path(&meme.id)?;
                self.fit_to_screen(&composed, &out)?;
                Ok(out)
            });

        let _ = fs::remove_file(downloaded);
        let _ = fs::remove_file(&composed);
        result
    }

    /// The configured fallback image fitted to the screen, or a generated
    /// black screen if none is configured
    pub fn prepare_fallback(&self) -> Result<PathBuf, RenderError> {
        match &self.config.fallback_image {
            Some(path) => {
                if !path.is_file() {
                    return Err(RenderError::FallbackMissing(path.clone()));
                }
                let out = self.output_path(&path.to_string_lossy())?;
                self.fit_to_screen(path, &out)?;
                Ok(out)
            }
            None => {
                let out = self.output_path(FALLBACK_MESSAGE)?;
                self.render_into(&out, |staging| {
                    compose::placeholder_args(
                        self.screen,
                        FALLBACK_MESSAGE,
                        self.config.font.size,
                        staging,
                    )
                })?;
                Ok(out)
            }
        }
    }

    /// Remove earlier renders except `keep`, once `keep` is the wallpaper
    pub fn prune_old_wallpapers(&self, keep: &Path) {
        let Ok(entries) = fs::read_dir(&self.work_dir) else {
            return;
        };
        let keep_name = keep.file_name();

        for entry in entries.flatten() {
            let name = entry.file_name();
            if Some(name.as_os_str()) == keep_name {
                continue;
            }
            let name = name.to_string_lossy();
            if name.starts_with("wallpaper-")
                && name.ends_with(".jpg")
                && let Err(err) = fs::remove_file(entry.path())
            {
                tracing::debug!(file = %name, error = %err, "could not remove old wallpaper");
            }
        }
    }

    fn fetch_image(&self, url: &str) -> Result<PathBuf, RenderError> {
        let download_err = |reason: String| RenderError::Download {
            url: url.to_string(),
            reason,
        };

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("memewall/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(self.config.request_timeout_secs))
            .build()
            .map_err(|e| download_err(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .map_err(|e| download_err(e.to_string()))?;
        if !response.status().is_success() {
            return Err(download_err(format!("HTTP {}", response.status())));
        }
        let bytes = response.bytes().map_err(|e| download_err(e.to_string()))?;

        let path = self
            .work_dir
            .join(format!("downloaded.{}", image_extension(url)));
        fs::write(&path, &bytes).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn add_title(&self, image: &Path, title: &str, out: &Path) -> Result<(), RenderError> {
        let (width, _) = identify(image)?;
        let mut caption = Caption {
            title,
            font: Some(self.config.font.name.as_str()).filter(|f| !f.is_empty()),
            point_size: self.config.font.size,
        };

        let args = compose::caption_args(
            image,
            width,
            &caption,
            self.config.bottom_strip_height,
            out,
        );
        match run_magick(&args) {
            Err(err) if caption.font.is_some() => {
                tracing::warn!(
                    font = %self.config.font.name,
                    error = %err,
                    "rendering title failed, retrying with the default font"
                );
                caption.font = None;
                run_magick(&compose::caption_args(
                    image,
                    width,
                    &caption,
                    self.config.bottom_strip_height,
                    out,
                ))
            }
            result => result,
        }
    }

    fn fit_to_screen(&self, image: &Path, out: &Path) -> Result<(), RenderError> {
        let size = identify(image)?;
        tracing::debug!(?size, screen = %self.screen, "fitting image to screen");
        self.render_into(out, |staging| compose::fit_args(image, size, self.screen, staging))
    }

    /// Run ImageMagick into a staging file and move it over `out` only on
    /// success, so a failed render never clobbers the current wallpaper.
    fn render_into<F>(&self, out: &Path, build_args: F) -> Result<(), RenderError>
    where
        F: FnOnce(&Path) -> Vec<String>,
    {
        let file_name = out
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wallpaper.jpg".to_string());
        let staging = self.work_dir.join(format!("rendering-{}", file_name));

        if let Err(err) = run_magick(&build_args(&staging)) {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }

        fs::rename(&staging, out).map_err(|source| RenderError::Io {
            path: out.to_path_buf(),
            source,
        })
    }

    /// Where the wallpaper for `id` is rendered. Existing files are left
    /// alone until the new one has been applied.
    fn output_path(&self, id: &str) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.work_dir).map_err(|source| RenderError::Io {
            path: self.work_dir.clone(),
            source,
        })?;
        Ok(self.work_dir.join(wallpaper_file_name(id)))
    }
}

fn wallpaper_file_name(id: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    let hex: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    format!("wallpaper-{}.jpg", hex)
}

/// File extension of an image URL, defaulting to jpg
fn image_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| "jpg".to_string())
}
