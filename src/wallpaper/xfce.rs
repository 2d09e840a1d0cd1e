use std::path::Path;

use super::WallpaperError;
use crate::common::process::run_checked;

const CHANNEL: &str = "xfce4-desktop";
const DEFAULT_PROPERTY: &str = "/backdrop/screen0/monitor0/workspace0/last-image";

/// Sets every monitor/workspace backdrop xfdesktop knows about
pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    let listing = run_checked("xfconf-query", ["-c", CHANNEL, "-l"])?;
    let mut properties = image_properties(&listing);
    if properties.is_empty() {
        properties.push(DEFAULT_PROPERTY);
    }

    let image = path.to_string_lossy();
    for property in properties {
        run_checked(
            "xfconf-query",
            ["-c", CHANNEL, "-p", property, "--create", "-t", "string", "-s", &*image],
        )?;
    }
    Ok(())
}

fn image_properties(listing: &str) -> Vec<&str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("/backdrop/") && line.ends_with("/last-image"))
        .collect()
}
