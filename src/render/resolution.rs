use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::common::process::run_checked;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {:?}", s))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("bad width in {:?}", s))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("bad height in {:?}", s))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution must be non-zero, got {:?}", s));
        }
        Ok(Self { width, height })
    }
}

impl Resolution {
    /// Primary screen resolution, or 1920x1080 if it cannot be determined
    pub fn detect() -> Self {
        match Self::query() {
            Some(res) => res,
            None => {
                tracing::debug!("could not detect screen resolution, assuming 1920x1080");
                Self::default()
            }
        }
    }

    fn query() -> Option<Self> {
        if cfg!(target_os = "macos") {
            let out = run_checked("system_profiler", ["SPDisplaysDataType"]).ok()?;
            return parse_system_profiler(&out);
        }

        if cfg!(target_os = "windows") {
            let script = "Add-Type -AssemblyName System.Windows.Forms; \
                $b = [System.Windows.Forms.Screen]::PrimaryScreen.Bounds; \
                \"$($b.Width)x$($b.Height)\"";
            let out = run_checked("powershell", ["-NoProfile", "-Command", script]).ok()?;
            return out.parse().ok();
        }

        if std::env::var_os("SWAYSOCK").is_some()
            && let Ok(out) = run_checked("swaymsg", ["-t", "get_outputs"])
            && let Some(res) = parse_sway_outputs(&out)
        {
            return Some(res);
        }

        let out = run_checked("xrandr", std::iter::empty::<&str>()).ok()?;
        parse_xrandr(&out)
    }
}

/// First active output from `swaymsg -t get_outputs`
fn parse_sway_outputs(json: &str) -> Option<Resolution> {
    let outputs: serde_json::Value = serde_json::from_str(json).ok()?;
    outputs.as_array()?.iter().find_map(|out| {
        if !out["active"].as_bool().unwrap_or(false) {
            return None;
        }
        let width = u32::try_from(out["rect"]["width"].as_u64()?).ok()?;
        let height = u32::try_from(out["rect"]["height"].as_u64()?).ok()?;
        Some(Resolution { width, height })
    })
}

/// Prefers the primary output, then the first connected one, then the
/// mode marked current with `*`.
fn parse_xrandr(stdout: &str) -> Option<Resolution> {
    let primary = Regex::new(r"connected primary ([0-9]+x[0-9]+)").ok()?;
    let connected = Regex::new(r"connected ([0-9]+x[0-9]+)").ok()?;
    let current = Regex::new(r"(?m)^\s+([0-9]+x[0-9]+)\s.*\*").ok()?;

    [primary, connected, current]
        .iter()
        .find_map(|re| re.captures(stdout))
        .and_then(|caps| caps[1].parse().ok())
}

fn parse_system_profiler(stdout: &str) -> Option<Resolution> {
    let re = Regex::new(r"Resolution:\s*([0-9]+)\s*x\s*([0-9]+)").ok()?;
    let caps = re.captures(stdout)?;
    Some(Resolution {
        width: caps[1].parse().ok()?,
        height: caps[2].parse().ok()?,
    })
}
