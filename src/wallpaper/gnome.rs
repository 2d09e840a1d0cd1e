use std::path::Path;

use super::{WallpaperError, file_uri};
use crate::common::process::run_checked;

const SCHEMA: &str = "org.gnome.desktop.background";

pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    let uri = file_uri(path);

    run_checked("gsettings", ["set", SCHEMA, "picture-uri", uri.as_str()])?;

    // Only exists since GNOME 42
    if let Err(err) = run_checked(
        "gsettings",
        ["set", SCHEMA, "picture-uri-dark", uri.as_str()],
    ) {
        tracing::debug!(error = %err, "could not set dark-mode wallpaper");
    }

    run_checked("gsettings", ["set", SCHEMA, "picture-options", "zoom"])?;
    Ok(())
}
