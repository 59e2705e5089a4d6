//! Pinpoint - resolve addresses and device positions to map locations.

mod actor;
mod backend;
mod cli;
mod config;
mod core;
mod device;
mod logger;
mod map;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AppConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = Arc::new(AppConfig::load(&cli)?);

    match &cli.command {
        Commands::Locate { device } => cli::locate::run_locate(&config, device),
        Commands::Search { address } => cli::search::run_search(&config, &address.join(" ")),
        Commands::Suggest { query } => cli::suggest::run_suggest(&config, &query.join(" ")),
        Commands::Session { device } => cli::session::run_session(&config, device),
    }
}
