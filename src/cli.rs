use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Sets a random meme as your desktop wallpaper
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Settings file to use instead of the default
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// History file to use instead of the default
    #[arg(long = "history", global = true, value_name = "PATH")]
    pub history_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fetch a meme and set it as wallpaper (the default)
    Run,

    /// Inspect the list of memes already shown
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommands {
    /// List remembered memes, oldest first
    Show,
    /// Forget every remembered meme
    Clear,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Write the default settings file if there is none
    Init,
}
