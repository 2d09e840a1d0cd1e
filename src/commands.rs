use anyhow::{Context, Result};
use colored::*;
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::cli::{Cli, Commands, ConfigCommands, HistoryCommands};
use crate::common::paths;
use crate::config::MemeConfig;
use crate::meme::{HistoryStore, MemeApiSource, MemeRecord, MemeSource, Selector};
use crate::render::{Renderer, Resolution};
use crate::wallpaper::{WallpaperError, WallpaperSetter};

/// Files the commands work on, after CLI overrides
pub struct AppPaths {
    pub settings: PathBuf,
    pub history: PathBuf,
}

impl AppPaths {
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let settings = match &cli.config_file {
            Some(path) => path.clone(),
            None => paths::default_settings_file()?,
        };
        let history = match &cli.history_file {
            Some(path) => path.clone(),
            None => paths::default_history_file()?,
        };
        Ok(Self { settings, history })
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let paths = AppPaths::resolve(&cli)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => handle_run(&paths),
        Commands::History { command } => handle_history_command(command, &paths),
        Commands::Config { command } => handle_config_command(command, &paths),
    }
}

fn handle_run(paths: &AppPaths) -> Result<()> {
    let config = MemeConfig::load(&paths.settings)?;

    let setter = WallpaperSetter::detect();
    println!("Detected desktop: {}", setter.name().cyan());
    if let WallpaperSetter::Unsupported(desc) = &setter {
        return Err(WallpaperError::Unsupported(desc.clone()).into());
    }

    let screen = Resolution::detect();
    println!("Target resolution: {}", screen);

    let mut history = HistoryStore::load_or_empty(&paths.history, config.max_history);
    let renderer = Renderer::new(&config, paths::cache_dir()?, screen);

    let fresh = match MemeApiSource::new(&config) {
        Ok(source) => fresh_meme(&source, &config, &mut history, &mut rand::thread_rng()),
        Err(err) => {
            tracing::warn!(error = %err, "could not create the HTTP client");
            None
        }
    };
    let image = choose_wallpaper(&renderer, fresh)?;

    setter
        .apply(&image)
        .with_context(|| format!("setting the wallpaper on {}", setter))?;
    renderer.prune_old_wallpapers(&image);

    println!("{} ({})", "Wallpaper updated!".green(), image.display());
    Ok(())
}

/// A meme that has not been shown before, or None if the fallback should be used
fn fresh_meme<R: Rng + ?Sized>(
    source: &dyn MemeSource,
    config: &MemeConfig,
    history: &mut HistoryStore,
    rng: &mut R,
) -> Option<MemeRecord> {
    match Selector::new(source, config).select(history, rng) {
        Ok(meme) => {
            println!("Meme: {}", meme.title.bold());
            Some(meme)
        }
        Err(err) => {
            println!("{}", format!("{}, using the fallback image", err).yellow());
            None
        }
    }
}

/// Render the fresh meme if there is one, otherwise or on failure the fallback
fn choose_wallpaper(renderer: &Renderer<'_>, fresh: Option<MemeRecord>) -> Result<PathBuf> {
    let rendered = fresh.and_then(|meme| {
        renderer
            .prepare_meme(&meme)
            .inspect_err(|err| {
                tracing::warn!(id = %meme.id, error = %err, "could not render meme");
                println!("{}", "Could not render the meme, using the fallback image".yellow());
            })
            .ok()
    });

    match rendered {
        Some(path) => Ok(path),
        None => renderer
            .prepare_fallback()
            .context("preparing the fallback wallpaper"),
    }
}

fn handle_history_command(command: HistoryCommands, paths: &AppPaths) -> Result<()> {
    let config = MemeConfig::load(&paths.settings)?;

    match command {
        HistoryCommands::Show => {
            let history = HistoryStore::load(&paths.history, config.max_history)
                .context("reading meme history")?;
            if history.is_empty() {
                println!("{}", "No memes shown yet".yellow());
                return Ok(());
            }
            for (i, id) in history.ids().enumerate() {
                println!("{:>4}  {}", i + 1, id);
            }
            println!(
                "{}",
                format!("{} of {} slots used", history.len(), history.capacity()).dimmed()
            );
        }
        HistoryCommands::Clear => {
            let mut history = HistoryStore::load_or_empty(&paths.history, config.max_history);
            history.clear();
            history.save().context("clearing meme history")?;
            println!("{} {}", "Cleared".green(), history.path().display());
        }
    }
    Ok(())
}

fn handle_config_command(command: ConfigCommands, paths: &AppPaths) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = MemeConfig::load(&paths.settings)?;
            let json = serde_json::to_string_pretty(&config).context("serializing settings")?;
            println!("{}", json);
        }
        ConfigCommands::Init => init_config(&paths.settings)?,
    }
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("{} {}", "Settings already exist at".yellow(), path.display());
        return Ok(());
    }

    MemeConfig::default().save(path)?;
    println!("{} {}", "Wrote default settings to".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meme::{MemeError, SubredditTarget};
    use crate::render::RenderError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::Cell;
    use tempfile::TempDir;

    struct OfflineSource {
        calls: Cell<usize>,
    }

    impl MemeSource for OfflineSource {
        fn fetch(&self, _target: &SubredditTarget) -> Result<MemeRecord, MemeError> {
            self.calls.set(self.calls.get() + 1);
            Err(MemeError::Transport("network is unreachable".to_string()))
        }
    }

    struct FixedSource(MemeRecord);

    impl MemeSource for FixedSource {
        fn fetch(&self, _target: &SubredditTarget) -> Result<MemeRecord, MemeError> {
            Ok(self.0.clone())
        }
    }

    fn config_with_missing_fallback(temp_dir: &TempDir) -> MemeConfig {
        MemeConfig {
            max_attempts: 3,
            fallback_image: Some(temp_dir.path().join("missing.jpg")),
            ..MemeConfig::default()
        }
    }

    fn is_fallback_missing(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::FallbackMissing(_))
        )
    }

    #[test]
    fn exhausted_selection_yields_no_meme() {
        let temp_dir = TempDir::new().unwrap();
        let history_path = temp_dir.path().join("meme_history.json");
        let mut history = HistoryStore::new(&history_path, 10);
        history.record("https://i.redd.it/old.jpg");

        let source = OfflineSource {
            calls: Cell::new(0),
        };
        let config = config_with_missing_fallback(&temp_dir);
        let fresh = fresh_meme(&source, &config, &mut history, &mut StdRng::seed_from_u64(1));

        assert!(fresh.is_none());
        assert_eq!(source.calls.get(), 3);
        assert_eq!(history.ids().collect::<Vec<_>>(), vec!["https://i.redd.it/old.jpg"]);
        assert!(!history_path.exists());
    }

    #[test]
    fn fresh_meme_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let mut history = HistoryStore::new(temp_dir.path().join("meme_history.json"), 10);
        let meme = MemeRecord::new("one does not simply", "https://i.redd.it/boromir.jpg");

        let config = config_with_missing_fallback(&temp_dir);
        let fresh = fresh_meme(
            &FixedSource(meme.clone()),
            &config,
            &mut history,
            &mut StdRng::seed_from_u64(2),
        );

        assert_eq!(fresh, Some(meme.clone()));
        assert!(history.contains(&meme.id));
    }

    #[test]
    fn no_meme_goes_straight_to_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with_missing_fallback(&temp_dir);
        let renderer = Renderer::new(&config, temp_dir.path(), Resolution::default());

        let err = choose_wallpaper(&renderer, None).unwrap_err();
        assert!(is_fallback_missing(&err), "unexpected error: {:#}", err);
    }

    #[test]
    fn render_failure_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        let config = config_with_missing_fallback(&temp_dir);
        let renderer = Renderer::new(&config, temp_dir.path(), Resolution::default());
        let meme = MemeRecord::new("unreachable", "not a url");

        let err = choose_wallpaper(&renderer, Some(meme)).unwrap_err();
        assert!(is_fallback_missing(&err), "unexpected error: {:#}", err);
    }
}
