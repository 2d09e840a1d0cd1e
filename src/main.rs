mod cli;
mod commands;
mod common;
mod config;
mod logging;
mod meme;
mod render;
mod wallpaper;

use clap::Parser;
use colored::*;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.debug);

    if let Err(e) = commands::dispatch(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
