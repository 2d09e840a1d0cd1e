use anyhow::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated home for one test: settings, history and XDG dirs all live in
/// a temp dir that is removed on drop.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn settings_path(&self) -> PathBuf {
        self.path().join("settings.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.path().join("meme_history.json")
    }

    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }
}
