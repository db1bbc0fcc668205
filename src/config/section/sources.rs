//! `[sources]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [sources]
//! html = "index.html"
//! css = "style.css"
//! js = "script.js"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::store::BufferKind;

/// Paths of the source buffers, relative to the playground root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub html: PathBuf,
    pub css: PathBuf,
    pub js: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            html: "index.html".into(),
            css: "style.css".into(),
            js: "script.js".into(),
        }
    }
}

impl SourcesConfig {
    pub const TEMPLATE: &str = "\
[sources]
html = \"index.html\"            # Markup, inserted into <body>
css = \"style.css\"              # Styles, inserted into <style>
js = \"script.js\"               # Script, runs after the markup
";

    pub fn get(&self, kind: BufferKind) -> &Path {
        match kind {
            BufferKind::Html => &self.html,
            BufferKind::Css => &self.css,
            BufferKind::Js => &self.js,
        }
    }

    fn field(kind: BufferKind) -> FieldPath {
        match kind {
            BufferKind::Html => FieldPath::new("sources.html"),
            BufferKind::Css => FieldPath::new("sources.css"),
            BufferKind::Js => FieldPath::new("sources.js"),
        }
    }

    /// Source paths must be relative and distinct.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for kind in BufferKind::ALL {
            let path = self.get(kind);
            if path.as_os_str().is_empty() {
                diag.error(Self::field(kind), "path must not be empty");
            } else if path.is_absolute() {
                diag.error_with_hint(
                    Self::field(kind),
                    format!("path must be relative to the playground root, got `{}`", path.display()),
                    "use a path like \"index.html\"",
                );
            }
        }

        if self.html == self.css || self.html == self.js || self.css == self.js {
            diag.error(FieldPath::new("sources"), "html, css and js must be different files");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::store::BufferKind;
    use std::path::Path;

    #[test]
    fn test_sources_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.sources.get(BufferKind::Html), Path::new("index.html"));
        assert_eq!(config.sources.get(BufferKind::Css), Path::new("style.css"));
        assert_eq!(config.sources.get(BufferKind::Js), Path::new("script.js"));
    }

    #[test]
    fn test_sources_override() {
        let config = test_parse_config("[sources]\njs = \"src/main.js\"");
        assert_eq!(config.sources.js, Path::new("src/main.js"));
        assert_eq!(config.sources.html, Path::new("index.html"));
    }

    #[test]
    fn test_sources_validation() {
        let mut diag = crate::config::ConfigDiagnostics::new();
        test_parse_config("[sources]\ncss = \"index.html\"").sources.validate(&mut diag);
        assert_eq!(diag.len(), 1);

        let mut diag = crate::config::ConfigDiagnostics::new();
        test_parse_config("").sources.validate(&mut diag);
        assert!(diag.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_sources_reject_absolute() {
        let mut diag = crate::config::ConfigDiagnostics::new();
        test_parse_config("[sources]\nhtml = \"/tmp/index.html\"").sources.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
