//! Kiln - a front-end asset builder with live reload.

mod actor;
mod cli;
mod config;
mod core;
mod freshness;
mod image;
mod jobs;
mod logger;
mod pattern;
mod pipeline;
mod reload;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::KilnConfig;

fn main() -> Result<()> {
    // Before any blocking operation
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Arc::new(KilnConfig::load(&cli)?);
    match &config.config_path {
        Some(path) => crate::debug!("config"; "{} ({} mode)", path.display(), config.mode),
        None => crate::debug!("config"; "defaults at {} ({} mode)", config.root.display(), config.mode),
    }

    cli::run::run(cli.command(), config)
}
