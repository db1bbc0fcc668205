//! Configuration utility functions.

use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::store::ResourceList;

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found.
///
/// # Example
/// ```text
/// /home/user/pad/assets/     ← cwd
/// /home/user/pad/livepad.toml ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}

/// Rewrite `[resources] urls` in the config file, leaving other sections as they are.
///
/// The file is re-serialized, so comments in it are not preserved.
pub fn write_resources(config_path: &Path, resources: &ResourceList) -> Result<(), ConfigError> {
    let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io(config_path.to_path_buf(), e))?;
    let updated = replace_resources(&content, resources)?;
    fs::write(config_path, updated).map_err(|e| ConfigError::Io(config_path.to_path_buf(), e))
}

fn replace_resources(content: &str, resources: &ResourceList) -> Result<String, ConfigError> {
    let mut table: toml::Table = toml::from_str(content)?;

    let urls = toml::Value::Array(resources.iter().map(|url| toml::Value::String(url.to_owned())).collect());
    match table.get_mut("resources").and_then(toml::Value::as_table_mut) {
        Some(section) => {
            section.insert("urls".into(), urls);
        }
        None => {
            let mut section = toml::Table::new();
            section.insert("urls".into(), urls);
            table.insert("resources".into(), toml::Value::Table(section));
        }
    }

    Ok(toml::to_string_pretty(&table)?)
}
