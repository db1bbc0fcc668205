//! `livepad.toml` generation for new playgrounds.

use crate::config::section::{PreviewConfig, ServeConfig, ShareConfig, SourcesConfig};
use crate::store::{PRESETS, Preset};

/// Resources a new playground starts with.
const DEFAULT_PRESETS: &[&str] = &["bootstrap-css"];

/// Generate livepad.toml content with comments
pub fn generate_config_template() -> String {
    let mut out = format!("# livepad configuration file (v{})\n\n", env!("CARGO_PKG_VERSION"));

    for section in [SourcesConfig::TEMPLATE, PreviewConfig::TEMPLATE] {
        out.push_str(section);
        out.push('\n');
    }

    out.push_str("[resources]                    # Inserted in order, managed by `livepad add`\n");
    out.push_str("urls = [\n");
    for preset in default_presets() {
        out.push_str(&format!("    \"{}\",  # {}\n", preset.url, preset.name));
    }
    out.push_str("]\n\n");

    out.push_str(ShareConfig::TEMPLATE);
    out.push('\n');
    out.push_str(ServeConfig::TEMPLATE);
    out
}

fn default_presets() -> impl Iterator<Item = &'static Preset> {
    PRESETS.iter().filter(|p| DEFAULT_PRESETS.contains(&p.id))
}
