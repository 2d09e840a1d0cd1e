use std::path::Path;

use super::WallpaperError;
use crate::common::process::run_checked;

pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    // swaymsg output "*" bg <path> fill
    let command = format!("output \"*\" bg \"{}\" fill", path.display());
    run_checked("swaymsg", [command.as_str()])?;
    Ok(())
}
