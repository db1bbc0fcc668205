//! `livepad add` / `remove` / `resources`: manage `[resources] urls`.
//!
//! Edits go through [`ResourceList`], so URLs are validated and kept unique
//! before anything is written back to `livepad.toml`. A running `serve`
//! picks the change up through its config watcher.

use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use crate::config::{PlaygroundConfig, write_resources};
use crate::log;
use crate::store::{PRESETS, ResourceKind, ResourceList, preset};

/// Append a resource, given either as a URL or as a preset id.
pub fn add(config: &PlaygroundConfig, url: Option<&str>, preset_id: Option<&str>) -> Result<()> {
    let url = match (url, preset_id) {
        (_, Some(id)) => preset(id)?.url,
        (Some(url), None) => url,
        (None, None) => anyhow::bail!("a URL or --preset is required"),
    };

    let mut list = config.resources.list.clone();
    list.add(url)?;
    save(config, &list)?;

    log!("resources"; "added {} ({})", url, kind_label(ResourceKind::classify(url)));
    Ok(())
}

/// Remove a resource by its exact URL.
pub fn remove(config: &PlaygroundConfig, url: &str) -> Result<()> {
    let mut list = config.resources.list.clone();
    list.remove(url)?;
    save(config, &list)?;

    log!("resources"; "removed {}", url);
    Ok(())
}

/// Print the resource list in document order.
pub fn list(config: &PlaygroundConfig) {
    if config.resources.list.is_empty() {
        log!("resources"; "none, add one with `livepad add <url>`");
        return;
    }
    for (i, url) in config.resources.list.iter().enumerate() {
        let kind = kind_label(ResourceKind::classify(url));
        println!("{:>3}  {:<6} {}", i + 1, kind.dimmed(), url);
    }
}

/// Print the presets accepted by `livepad add --preset`.
pub fn presets() {
    for preset in PRESETS {
        println!("{:<14} {:<14} {}", preset.id.bold(), preset.name, preset.url.dimmed());
    }
}

fn save(config: &PlaygroundConfig, list: &ResourceList) -> Result<()> {
    write_resources(&config.config_path, list)
        .with_context(|| format!("Failed to update {}", config.config_path.display()))
}

fn kind_label(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Stylesheet => "css",
        ResourceKind::Script => "script",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::store::ResourceError;
    use std::fs;
    use tempfile::TempDir;

    /// Write `content` as livepad.toml and load it back the way the CLI does.
    fn playground(temp: &TempDir, content: &str) -> PlaygroundConfig {
        let path = temp.path().join("livepad.toml");
        fs::write(&path, content).unwrap();
        reload(&path)
    }

    fn reload(path: &std::path::Path) -> PlaygroundConfig {
        let mut config = test_parse_config(&fs::read_to_string(path).unwrap());
        config.config_path = path.to_path_buf();
        config
    }

    #[test]
    fn test_add_and_remove_round_trip_through_file() {
        let temp = TempDir::new().unwrap();
        let config = playground(&temp, "[preview]\ntheme = \"dark\"\n");

        add(&config, Some("https://x.dev/a.css"), None).unwrap();
        let config = reload(&config.config_path);
        add(&config, None, Some("jquery")).unwrap();
        let config = reload(&config.config_path);

        let urls: Vec<_> = config.resources.list.iter().collect();
        assert_eq!(urls, ["https://x.dev/a.css", preset("jquery").unwrap().url]);
        assert_eq!(config.preview.theme, crate::store::RenderTheme::Dark);

        remove(&config, "https://x.dev/a.css").unwrap();
        let config = reload(&config.config_path);
        assert_eq!(config.resources.list.len(), 1);
    }

    #[test]
    fn test_rejected_edits_leave_file_untouched() {
        let temp = TempDir::new().unwrap();
        let original = "[resources]\nurls = [\"https://x.dev/a.js\"]\n";
        let config = playground(&temp, original);

        let err = add(&config, Some("https://x.dev/a.js"), None).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ResourceError>(),
            Some(&ResourceError::Duplicate("https://x.dev/a.js".into()))
        );
        assert!(add(&config, Some("/local.js"), None).is_err());
        assert!(add(&config, None, Some("left-pad")).is_err());
        assert!(remove(&config, "https://x.dev/missing.js").is_err());

        assert_eq!(fs::read_to_string(&config.config_path).unwrap(), original);
    }
}
