//! `[resources]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [resources]
//! urls = [
//!     "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css",
//! ]
//! ```
//!
//! Managed by `livepad add` / `livepad remove`; hand edits are validated on load.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::store::{ResourceError, ResourceList};

/// External resources, in the order they are inserted into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    #[serde(rename = "urls")]
    pub list: ResourceList,
}

impl ResourcesConfig {
    pub const FIELD: FieldPath = FieldPath::new("resources.urls");

    /// Every entry must be absolute and appear once.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut seen = ResourceList::new();
        for url in self.list.iter() {
            match seen.add(url) {
                Ok(()) => {}
                Err(err @ ResourceError::Duplicate(_)) => {
                    diag.error_with_hint(Self::FIELD, err.to_string(), "remove the repeated entry");
                }
                Err(err) => {
                    diag.error_with_hint(
                        Self::FIELD,
                        err.to_string(),
                        "use an absolute URL such as \"https://cdn.example.com/lib.js\"",
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_resources_parse_in_order() {
        let config = test_parse_config("[resources]\nurls = [\"https://x.dev/b.js\", \"https://x.dev/a.css\"]");
        let urls: Vec<_> = config.resources.list.iter().collect();
        assert_eq!(urls, ["https://x.dev/b.js", "https://x.dev/a.css"]);
    }

    #[test]
    fn test_resources_default_empty() {
        assert!(test_parse_config("").resources.list.is_empty());
    }

    #[test]
    fn test_resources_validation() {
        let config = test_parse_config(
            "[resources]\nurls = [\"https://x.dev/a.js\", \"lib.js\", \"https://x.dev/a.js\"]",
        );
        let mut diag = ConfigDiagnostics::new();
        config.resources.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
