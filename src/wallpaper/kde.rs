use std::path::Path;

use super::{WallpaperError, file_uri};
use crate::common::process::{ProcessError, run_checked};

/// Plasma 6, Plasma 5, and Plasma 5 on some distros
const QDBUS_BINARIES: &[&str] = &["qdbus6", "qdbus", "qdbus-qt5"];

pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    let mut last_err = match run_checked("plasma-apply-wallpaperimage", [path]) {
        Ok(_) => return Ok(()),
        Err(err) => err,
    };
    tracing::debug!(error = %last_err, "plasma-apply-wallpaperimage failed, trying qdbus");

    let script = plasma_script(path);
    for qdbus in QDBUS_BINARIES {
        match run_qdbus_script(qdbus, &script) {
            Ok(()) => return Ok(()),
            Err(err) => last_err = err,
        }
    }

    Err(last_err.into())
}

fn plasma_script(path: &Path) -> String {
    let uri = file_uri(path).replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        r#"desktops().forEach(d => {{
    d.wallpaperPlugin = "org.kde.image";
    d.currentConfigGroup = Array("Wallpaper", "org.kde.image", "General");
    d.writeConfig("Image", "{}");
    d.reloadConfig();
}});"#,
        uri
    )
}

fn run_qdbus_script(qdbus: &str, script: &str) -> Result<(), ProcessError> {
    run_checked(
        qdbus,
        [
            "org.kde.plasmashell",
            "/PlasmaShell",
            "org.kde.PlasmaShell.evaluateScript",
            script,
        ],
    )?;
    Ok(())
}
