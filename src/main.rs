//! livepad - live HTML/CSS/JS playground with a sandboxed browser preview.

#![allow(dead_code)]

mod actor;
mod bridge;
mod cli;
mod compose;
mod config;
mod core;
mod embed;
mod host;
mod logger;
mod observer;
mod scheduler;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PlaygroundConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(PlaygroundConfig::load(cli)?);

    match &cli.command {
        Commands::Init { .. } => cli::init::new_playground(&config),
        Commands::Serve { .. } => cli::serve::serve(),
        Commands::Export { args } => cli::export::export(&config, args),
        Commands::Add { url, preset } => cli::resources::add(&config, url.as_deref(), preset.as_deref()),
        Commands::Remove { url } => cli::resources::remove(&config, url),
        Commands::Resources { presets: true } => {
            cli::resources::presets();
            Ok(())
        }
        Commands::Resources { presets: false } => {
            cli::resources::list(&config);
            Ok(())
        }
    }
}
