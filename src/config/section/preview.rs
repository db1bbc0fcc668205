//! `[preview]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! theme = "light"          # light | dark
//! auto_refresh = true      # Re-render after edits settle
//! debounce_ms = 300        # Quiet period before a render
//! console = true           # Print preview console output in the terminal
//! console_limit = 500      # Console entries kept per session
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::store::RenderTheme;

/// Accepted `debounce_ms` range.
pub const DEBOUNCE_RANGE: std::ops::RangeInclusive<u64> = 10..=10_000;

/// Preview behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub theme: RenderTheme,
    pub auto_refresh: bool,
    pub debounce_ms: u64,
    pub console: bool,
    pub console_limit: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            theme: RenderTheme::Light,
            auto_refresh: true,
            debounce_ms: 300,
            console: true,
            console_limit: 500,
        }
    }
}

impl PreviewConfig {
    pub const TEMPLATE: &str = "\
[preview]
theme = \"light\"                # light | dark
auto_refresh = true            # Re-render after edits settle
debounce_ms = 300              # Quiet period before a render (ms)
console = true                 # Print preview console output in the terminal
";

    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !DEBOUNCE_RANGE.contains(&self.debounce_ms) {
            diag.error_with_hint(
                FieldPath::new("preview.debounce_ms"),
                format!("{} ms is out of range", self.debounce_ms),
                format!(
                    "use a value between {} and {}",
                    DEBOUNCE_RANGE.start(),
                    DEBOUNCE_RANGE.end()
                ),
            );
        }
        if self.console_limit == 0 {
            diag.error(FieldPath::new("preview.console_limit"), "must be at least 1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_preview_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.preview.theme, RenderTheme::Light);
        assert!(config.preview.auto_refresh);
        assert_eq!(config.preview.debounce(), Duration::from_millis(300));
        assert!(config.preview.console);
        assert_eq!(config.preview.console_limit, 500);
    }

    #[test]
    fn test_preview_override() {
        let config = test_parse_config("[preview]\ntheme = \"dark\"\nauto_refresh = false\ndebounce_ms = 250");
        assert_eq!(config.preview.theme, RenderTheme::Dark);
        assert!(!config.preview.auto_refresh);
        assert_eq!(config.preview.debounce_ms, 250);
    }

    #[test]
    fn test_preview_rejects_unknown_theme() {
        let result: Result<crate::config::PlaygroundConfig, _> = toml::from_str("[preview]\ntheme = \"sepia\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_debounce_range() {
        for (ms, ok) in [(5, false), (10, true), (300, true), (10_000, true), (10_001, false)] {
            let mut diag = ConfigDiagnostics::new();
            PreviewConfig { debounce_ms: ms, ..Default::default() }.validate(&mut diag);
            assert_eq!(diag.is_empty(), ok, "debounce_ms = {ms}");
        }
    }
}
