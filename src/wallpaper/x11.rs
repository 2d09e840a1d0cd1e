use std::ffi::OsStr;
use std::path::Path;

use super::WallpaperError;
use crate::common::process::{is_available, run_checked};

pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    if !is_available("feh") {
        return Err(WallpaperError::MissingTool {
            tool: "feh",
            hint: "install feh to set wallpapers on plain X11 sessions",
        });
    }

    run_checked("feh", [OsStr::new("--bg-fill"), path.as_os_str()])?;
    Ok(())
}
