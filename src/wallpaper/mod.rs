//! Applying an image as the desktop background.
//!
//! The backend is detected once at startup from the OS and the usual
//! desktop session variables, then handed around as a [`WallpaperSetter`].

mod gnome;
mod hyprland;
mod kde;
mod macos;
mod sway;
mod windows;
mod x11;
mod xfce;

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::common::process::ProcessError;

#[derive(Error, Debug)]
pub enum WallpaperError {
    #[error("Don't know how to set the wallpaper on this desktop ({0})")]
    Unsupported(String),

    #[error("Wallpaper {} is not accessible: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} is required to set the wallpaper here: {hint}")]
    MissingTool { tool: &'static str, hint: &'static str },

    #[error(transparent)]
    Command(#[from] ProcessError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WallpaperSetter {
    Windows,
    MacOs,
    Gnome,
    Kde,
    Xfce,
    Sway,
    Hyprland,
    /// Any other X11 session, via feh
    X11,
    Unsupported(String),
}

/// The bits of the environment that decide which backend to use
#[derive(Debug, Clone, Default)]
pub struct SessionInfo {
    pub os: String,
    pub current_desktop: Option<String>,
    pub session_desktop: Option<String>,
    pub sway_socket: bool,
    pub hyprland_signature: bool,
    pub x11_display: bool,
}

impl SessionInfo {
    pub fn current() -> Self {
        let non_empty = |key: &str| env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            os: env::consts::OS.to_string(),
            current_desktop: non_empty("XDG_CURRENT_DESKTOP"),
            session_desktop: non_empty("XDG_SESSION_DESKTOP")
                .or_else(|| non_empty("DESKTOP_SESSION")),
            sway_socket: env::var_os("SWAYSOCK").is_some(),
            hyprland_signature: env::var_os("HYPRLAND_INSTANCE_SIGNATURE").is_some(),
            x11_display: env::var_os("DISPLAY").is_some(),
        }
    }
}

impl WallpaperSetter {
    pub fn detect() -> Self {
        Self::from_session(&SessionInfo::current())
    }

    pub fn from_session(session: &SessionInfo) -> Self {
        match session.os.as_str() {
            "windows" => return WallpaperSetter::Windows,
            "macos" => return WallpaperSetter::MacOs,
            _ => {}
        }

        // XDG_CURRENT_DESKTOP may be a list like "ubuntu:GNOME"
        let names = session
            .current_desktop
            .iter()
            .chain(session.session_desktop.iter())
            .flat_map(|value| value.split(':'))
            .map(|name| name.trim().to_lowercase());

        for name in names {
            if let Some(setter) = Self::from_desktop_name(&name) {
                return setter;
            }
        }

        if session.sway_socket {
            return WallpaperSetter::Sway;
        }
        if session.hyprland_signature {
            return WallpaperSetter::Hyprland;
        }
        if session.x11_display {
            return WallpaperSetter::X11;
        }

        let described = session
            .current_desktop
            .clone()
            .or_else(|| session.session_desktop.clone())
            .unwrap_or_else(|| format!("{} without a desktop session", session.os));
        WallpaperSetter::Unsupported(described)
    }

    fn from_desktop_name(name: &str) -> Option<Self> {
        const GNOME_LIKE: &[&str] = &["gnome", "unity", "ubuntu", "budgie", "pantheon"];

        if name.contains("kde") || name.contains("plasma") {
            Some(WallpaperSetter::Kde)
        } else if GNOME_LIKE.iter().any(|g| name.contains(g)) {
            Some(WallpaperSetter::Gnome)
        } else if name.contains("xfce") {
            Some(WallpaperSetter::Xfce)
        } else if name.contains("sway") {
            Some(WallpaperSetter::Sway)
        } else if name.contains("hyprland") {
            Some(WallpaperSetter::Hyprland)
        } else {
            None
        }
    }

    pub fn name(&self) -> String {
        match self {
            WallpaperSetter::Windows => "Windows".to_string(),
            WallpaperSetter::MacOs => "macOS".to_string(),
            WallpaperSetter::Gnome => "GNOME".to_string(),
            WallpaperSetter::Kde => "KDE Plasma".to_string(),
            WallpaperSetter::Xfce => "XFCE".to_string(),
            WallpaperSetter::Sway => "Sway".to_string(),
            WallpaperSetter::Hyprland => "Hyprland".to_string(),
            WallpaperSetter::X11 => "X11".to_string(),
            WallpaperSetter::Unsupported(desc) => format!("unsupported ({})", desc),
        }
    }

    /// Set `path` as the wallpaper
    pub fn apply(&self, path: &Path) -> Result<(), WallpaperError> {
        let backend: fn(&Path) -> Result<(), WallpaperError> = match self {
            WallpaperSetter::Windows => windows::apply_wallpaper,
            WallpaperSetter::MacOs => macos::apply_wallpaper,
            WallpaperSetter::Gnome => gnome::apply_wallpaper,
            WallpaperSetter::Kde => kde::apply_wallpaper,
            WallpaperSetter::Xfce => xfce::apply_wallpaper,
            WallpaperSetter::Sway => sway::apply_wallpaper,
            WallpaperSetter::Hyprland => hyprland::apply_wallpaper,
            WallpaperSetter::X11 => x11::apply_wallpaper,
            WallpaperSetter::Unsupported(desc) => {
                return Err(WallpaperError::Unsupported(desc.clone()));
            }
        };

        let abs_path = path.canonicalize().map_err(|source| WallpaperError::Path {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(backend = %self, path = %abs_path.display(), "applying wallpaper");
        backend(&abs_path)
    }
}

impl fmt::Display for WallpaperSetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// `file://` URI for an absolute path
fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}
