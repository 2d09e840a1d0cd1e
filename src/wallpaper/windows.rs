use std::path::Path;

use super::WallpaperError;
use crate::common::process::run_checked;

/// SystemParametersInfo(SPI_SETDESKWALLPAPER, 0, path, SPIF_UPDATEINIFILE | SPIF_SENDCHANGE)
/// through PowerShell, which saves linking against user32 directly.
pub fn apply_wallpaper(path: &Path) -> Result<(), WallpaperError> {
    let script = powershell_script(path);
    run_checked(
        "powershell",
        ["-NoProfile", "-NonInteractive", "-Command", script.as_str()],
    )?;
    Ok(())
}

fn powershell_script(path: &Path) -> String {
    // Single-quoted PowerShell strings only need ' doubled
    let quoted = path.display().to_string().replace('\'', "''");
    format!(
        "Add-Type -TypeDefinition 'using System.Runtime.InteropServices; \
         public class MemewallNative {{ \
         [DllImport(\"user32.dll\", CharSet = CharSet.Unicode)] \
         public static extern int SystemParametersInfo(int uAction, int uParam, string lpvParam, int fuWinIni); }}'; \
         if ([MemewallNative]::SystemParametersInfo(20, 0, '{}', 3) -eq 0) {{ exit 1 }}",
        quoted
    )
}
