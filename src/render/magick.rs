//! Thin wrappers around the ImageMagick command line tools.
//!
//! ImageMagick 7 ships a single `magick` binary, version 6 installs
//! `convert` and `identify` separately. Both are tried.

use std::path::Path;

use super::RenderError;
use crate::common::process::{ProcessError, run_checked};

/// Run an ImageMagick conversion, falling back to `convert` for IM6
pub fn run_magick(args: &[String]) -> Result<(), RenderError> {
    tracing::debug!(?args, "running ImageMagick");
    match run_checked("magick", args) {
        Ok(_) => Ok(()),
        Err(ProcessError::Spawn { .. }) => {
            run_checked("convert", args)?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Width and height of the first frame of an image
pub fn identify(path: &Path) -> Result<(u32, u32), RenderError> {
    let frame = format!("{}[0]", path.display());
    let args = ["-format", "%w %h", frame.as_str()];
    let stdout = match run_checked("magick", ["identify"].iter().chain(&args)) {
        Ok(out) => out,
        Err(ProcessError::Spawn { .. }) => run_checked("identify", args)?,
        Err(err) => return Err(err.into()),
    };

    parse_dimensions(&stdout).ok_or_else(|| {
        RenderError::UnexpectedOutput(format!(
            "could not read dimensions of {}: {:?}",
            path.display(),
            stdout
        ))
    })
}

fn parse_dimensions(output: &str) -> Option<(u32, u32)> {
    let mut parts = output.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// Neutralise the parts of a caption ImageMagick would otherwise interpret:
/// `%` escapes and a leading `@`, which reads text from a file.
pub fn escape_text(text: &str) -> String {
    let escaped = text.replace('%', "%%");
    if escaped.starts_with('@') {
        format!("\\{}", escaped)
    } else {
        escaped
    }
}
