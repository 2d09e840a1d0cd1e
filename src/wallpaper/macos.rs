use std::path::Path;

use super::WallpaperError;
use crate::common::process::run_checked;

pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    let script = finder_script(path);
    run_checked("osascript", ["-e", script.as_str()])?;
    Ok(())
}

fn finder_script(path: &Path) -> String {
    let escaped = path
        .display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");
    format!(
        "tell application \"Finder\" to set desktop picture to POSIX file \"{}\"",
        escaped
    )
}
