//! Playground configuration management for `livepad.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [sources] [preview] [resources] [share] [serve]
//! ├── types/         # ConfigError, diagnostics, field paths, global handle
//! ├── util           # config discovery, resource list write-back
//! └── mod.rs         # PlaygroundConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

pub use section::{PreviewConfig, ResourcesConfig, ServeConfig, ShareConfig, SourcesConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config};
pub use util::{find_config_file, write_resources};

use crate::cli::{Cli, Commands, ServeArgs};
use crate::store::BufferKind;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config filename
pub const CONFIG_FILE: &str = "livepad.toml";

/// Root configuration structure representing livepad.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaygroundConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Playground root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub resources: ResourcesConfig,

    #[serde(default)]
    pub share: ShareConfig,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl PlaygroundConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find the config file.
    /// The playground root is the config file's parent directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if cli.is_init() {
            let mut config = Self::default();
            config.root = config_path.parent().map(Path::to_path_buf).unwrap_or_default();
            config.config_path = config_path;
            config.cli = Some(cli);
            return Ok(config);
        }

        if !exists {
            return Err(ConfigError::NotFound(cli.config.clone()).into());
        }

        let mut config = Self::from_path(&config_path)?;
        config.config_path = crate::utils::path::normalize_path(&config_path);
        config.root = config.config_path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.cli = Some(cli);
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let path = match &cli.command {
            Commands::Init { name: Some(name) } => cwd.join(name).join(&cli.config),
            Commands::Init { name: None } => cwd.join(&cli.config),
            _ => match find_config_file(&cli.config) {
                Some(path) => return Ok((path, true)),
                None => cwd.join(&cli.config),
            },
        };
        let exists = path.exists();
        Ok((path, exists))
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            let mut diag = ConfigDiagnostics::new();
            diag.ignored(ignored);
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            diag.print_warnings(&name);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Absolute path of a source buffer file.
    pub fn source_path(&self, kind: BufferKind) -> PathBuf {
        self.root.join(self.sources.get(kind))
    }

    /// Which buffer a changed file belongs to, if any.
    pub fn buffer_for_path(&self, path: &Path) -> Option<BufferKind> {
        let path = crate::utils::path::normalize_path(path);
        BufferKind::ALL
            .into_iter()
            .find(|&kind| crate::utils::path::normalize_path(&self.source_path(kind)) == path)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the playground root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve { args } = &cli.command {
            self.apply_serve_args(args);
        }
    }

    /// Apply serve arguments from CLI.
    fn apply_serve_args(&mut self, args: &ServeArgs) {
        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.serve.watch, args.watch.as_ref());
        Self::update_option(&mut self.preview.theme, args.theme.as_ref());
        if args.manual {
            self.preview.auto_refresh = false;
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the whole configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.sources.validate(&mut diag);
        self.preview.validate(&mut diag);
        self.resources.validate(&mut diag);
        self.serve.validate(&mut diag);

        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PlaygroundConfig {
    let (parsed, ignored) = PlaygroundConfig::parse_with_ignored(content).unwrap();
    assert!(ignored.is_empty(), "test config has unknown fields: {:?}", ignored);
    parsed
}

// ============================================================================
// tests
// ============================================================================
