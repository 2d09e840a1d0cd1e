use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use super::WallpaperError;
use crate::common::process::{ProcessError, is_available, run_checked};

/// Apply wallpaper on Hyprland using swww
pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    if !is_available("swww") {
        return Err(WallpaperError::MissingTool {
            tool: "swww",
            hint: "install swww, it handles wallpapers on Hyprland",
        });
    }

    // Start the daemon if nobody answers
    if run_checked("swww", ["query"]).is_err() {
        Command::new("swww-daemon")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: "swww-daemon".to_string(),
                source,
            })?;

        std::thread::sleep(Duration::from_millis(200));
    }

    run_checked("swww", [OsStr::new("img"), path.as_os_str()])?;
    Ok(())
}
