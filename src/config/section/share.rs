//! `[share]` section configuration.
//!
//! Meta tags of the exported document (`livepad export`, `/export`).

use serde::{Deserialize, Serialize};

use crate::compose::share::ShareMeta;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub title: String,
    pub description: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        let meta = ShareMeta::default();
        Self {
            title: meta.title,
            description: meta.description,
        }
    }
}

impl ShareConfig {
    pub const TEMPLATE: &str = "\
[share]
title = \"Playground\"           # <title> and og:title of exported pages
description = \"Code preview generated in livepad\"
";

    pub fn meta(&self) -> ShareMeta {
        ShareMeta {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_share_defaults_and_override() {
        let config = test_parse_config("");
        assert_eq!(config.share.title, "Playground");

        let config = test_parse_config("[share]\ntitle = \"Cards\"");
        assert_eq!(config.share.meta().title, "Cards");
        assert_eq!(config.share.description, "Code preview generated in livepad");
    }
}
