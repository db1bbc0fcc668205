//! Playground initialization.
//!
//! Writes `livepad.toml` and the three source files with the welcome
//! content. Source files that already exist are kept, so an existing folder
//! of HTML/CSS/JS can be adopted as a playground.

mod config;

use config::generate_config_template;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::PlaygroundConfig;
use crate::embed::welcome;
use crate::log;
use crate::store::BufferKind;

/// Create a new playground at the config's root.
pub fn new_playground(config: &PlaygroundConfig) -> Result<()> {
    let root = config.get_root();
    if config.config_path.exists() {
        bail!(
            "'{}' already exists.\n\
             Edit it directly, or use `livepad init <name>` for a new playground.",
            config.config_path.display()
        );
    }

    fs::create_dir_all(root).with_context(|| format!("Failed to create directory '{}'", root.display()))?;

    for kind in BufferKind::ALL {
        let path = config.source_path(kind);
        if path.exists() {
            log!("init"; "keeping existing {}", config.root_relative(&path).display());
            continue;
        }
        write_file(&path, welcome_content(kind))?;
    }
    write_file(&config.config_path, &generate_config_template())?;

    log!("init"; "playground ready, run `livepad serve` in {}", root.display());
    Ok(())
}

fn welcome_content(kind: BufferKind) -> &'static str {
    match kind {
        BufferKind::Html => welcome::HTML,
        BufferKind::Css => welcome::CSS,
        BufferKind::Js => welcome::JS,
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write '{}'", path.display()))
}
