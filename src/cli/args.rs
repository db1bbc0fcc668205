//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::store::RenderTheme;

/// livepad: live HTML/CSS/JS playground with a sandboxed browser preview
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: livepad.toml)
    #[arg(short = 'C', long, global = true, default_value = "livepad.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create a new playground with starter content
    #[command(visible_alias = "i")]
    Init {
        /// Playground directory name/path (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        name: Option<PathBuf>,
    },

    /// Start the preview server with live rendering
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },

    /// Export the playground as a single HTML document
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        args: ExportArgs,
    },

    /// Add an external stylesheet or script
    #[command(visible_alias = "a")]
    Add {
        /// Absolute URL of the resource
        #[arg(value_hint = clap::ValueHint::Url, required_unless_present = "preset", conflicts_with = "preset")]
        url: Option<String>,

        /// Add a popular package by id (see `livepad resources --presets`)
        #[arg(short, long)]
        preset: Option<String>,
    },

    /// Remove an external resource
    #[command(visible_alias = "rm")]
    Remove {
        /// Exact URL to remove
        url: String,
    },

    /// List external resources
    #[command(visible_alias = "r")]
    Resources {
        /// List the available package presets instead
        #[arg(long)]
        presets: bool,
    },
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<std::net::IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Preview theme
    #[arg(short, long, value_enum)]
    pub theme: Option<RenderTheme>,

    /// Start in manual mode: render only on request
    #[arg(short, long)]
    pub manual: bool,

    /// Enable file watching for auto-render
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub watch: Option<bool>,
}

/// Export command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ExportArgs {
    /// Export the exact preview document (with the console bridge)
    #[arg(long)]
    pub preview: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl Cli {
    pub fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }

    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
