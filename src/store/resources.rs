//! External script/stylesheet dependencies.
//!
//! The list is ordered by insertion and never reordered. Classification is
//! lexical (by URL suffix), never by fetching or sniffing content.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when editing a [`ResourceList`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceError {
    #[error("`{0}` is not an absolute URL")]
    NotAbsolute(String),

    #[error("`{0}` is already in the resource list")]
    Duplicate(String),

    #[error("`{0}` is not in the resource list")]
    NotFound(String),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

/// How a resource is linked into the composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// `<link rel="stylesheet">` in `<head>`
    Stylesheet,
    /// `<script src>` in `<body>`
    Script,
}

impl ResourceKind {
    /// Classify a URL by the suffix of its path.
    ///
    /// Query strings and fragments are ignored, so
    /// `https://cdn/x.css?v=2` is still a stylesheet. Anything not ending in
    /// `.css` is treated as a script.
    pub fn classify(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let is_css = path.len() >= 4
            && path
                .get(path.len() - 4..)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(".css"));
        if is_css { Self::Stylesheet } else { Self::Script }
    }
}

/// Ordered, duplicate-free list of absolute resource URLs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceList(Vec<String>);

impl ResourceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from URLs, validating each and rejecting duplicates.
    pub fn try_from_urls<I, S>(urls: I) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::new();
        for url in urls {
            list.add(url)?;
        }
        Ok(list)
    }

    /// Append a URL. Must be absolute and not yet present.
    pub fn add(&mut self, url: impl Into<String>) -> Result<(), ResourceError> {
        let url = url.into();
        validate_url(&url)?;
        if self.contains(&url) {
            return Err(ResourceError::Duplicate(url));
        }
        self.0.push(url);
        Ok(())
    }

    /// Remove a URL, keeping the order of the rest.
    pub fn remove(&mut self, url: &str) -> Result<(), ResourceError> {
        let Some(index) = self.0.iter().position(|u| u == url) else {
            return Err(ResourceError::NotFound(url.to_string()));
        };
        self.0.remove(index);
        Ok(())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.0.iter().any(|u| u == url)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// URLs of the given kind, in list order.
    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &str> {
        self.iter().filter(move |url| ResourceKind::classify(url) == kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Check that `url` parses as an absolute URL with a host.
pub fn validate_url(url: &str) -> Result<(), ResourceError> {
    match url::Url::parse(url) {
        Ok(parsed) if parsed.has_host() || parsed.scheme() == "data" => Ok(()),
        _ => Err(ResourceError::NotAbsolute(url.to_string())),
    }
}

// ============================================================================
// Presets
// ============================================================================

/// A commonly used CDN package.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Short name used on the command line
    pub id: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

/// Popular packages offered by `livepad add --preset`.
pub const PRESETS: &[Preset] = &[
    Preset {
        id: "bootstrap-css",
        name: "Bootstrap CSS",
        url: "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css",
    },
    Preset {
        id: "bootstrap-js",
        name: "Bootstrap JS",
        url: "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/js/bootstrap.bundle.min.js",
    },
    Preset {
        id: "jquery",
        name: "jQuery",
        url: "https://cdn.jsdelivr.net/npm/jquery@3.7.1/dist/jquery.min.js",
    },
    Preset {
        id: "react",
        name: "React",
        url: "https://cdn.jsdelivr.net/npm/react@18.2.0/umd/react.production.min.js",
    },
    Preset {
        id: "react-dom",
        name: "React DOM",
        url: "https://cdn.jsdelivr.net/npm/react-dom@18.2.0/umd/react-dom.production.min.js",
    },
    Preset {
        id: "tailwind",
        name: "Tailwind CSS",
        url: "https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css",
    },
    Preset {
        id: "alpine",
        name: "Alpine.js",
        url: "https://cdn.jsdelivr.net/npm/alpinejs@3.13.3/dist/cdn.min.js",
    },
    Preset {
        id: "lodash",
        name: "Lodash",
        url: "https://cdn.jsdelivr.net/npm/lodash@4.17.21/lodash.min.js",
    },
];

/// Look up a preset by its id (case-insensitive).
pub fn preset(id: &str) -> Result<&'static Preset, ResourceError> {
    PRESETS
        .iter()
        .find(|p| p.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| ResourceError::UnknownPreset(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(ResourceKind::classify("https://x.dev/a.css"), ResourceKind::Stylesheet);
        assert_eq!(ResourceKind::classify("https://x.dev/a.CSS"), ResourceKind::Stylesheet);
        assert_eq!(ResourceKind::classify("https://x.dev/a.js"), ResourceKind::Script);
        assert_eq!(ResourceKind::classify("https://x.dev/a"), ResourceKind::Script);
        assert_eq!(
            ResourceKind::classify("https://x.dev/a.css?v=2#top"),
            ResourceKind::Stylesheet
        );
        // lexical only: ".css" somewhere else in the path does not count
        assert_eq!(ResourceKind::classify("https://x.dev/a.css/b"), ResourceKind::Script);
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut list = ResourceList::new();
        list.add("https://x.dev/a.css").unwrap();
        assert_eq!(
            list.add("https://x.dev/a.css"),
            Err(ResourceError::Duplicate("https://x.dev/a.css".into()))
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_add_rejects_relative() {
        let mut list = ResourceList::new();
        assert!(matches!(list.add("lib/a.js"), Err(ResourceError::NotAbsolute(_))));
        assert!(matches!(list.add(""), Err(ResourceError::NotAbsolute(_))));
        assert!(list.is_empty());
    }

    #[test]
    fn test_add_accepts_data_url() {
        let mut list = ResourceList::new();
        list.add("data:text/css,body%7Bcolor:red%7D").unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_order_preserved_on_remove() {
        let mut list =
            ResourceList::try_from_urls(["https://x.dev/a.css", "https://x.dev/b.js", "https://x.dev/c.css"])
                .unwrap();
        list.remove("https://x.dev/b.js").unwrap();
        let urls: Vec<_> = list.iter().collect();
        assert_eq!(urls, ["https://x.dev/a.css", "https://x.dev/c.css"]);
        assert!(matches!(list.remove("https://x.dev/b.js"), Err(ResourceError::NotFound(_))));
    }

    #[test]
    fn test_of_kind_keeps_order() {
        let list =
            ResourceList::try_from_urls(["https://x.dev/a.css", "https://x.dev/b.js", "https://x.dev/c.css"])
                .unwrap();
        let css: Vec<_> = list.of_kind(ResourceKind::Stylesheet).collect();
        let js: Vec<_> = list.of_kind(ResourceKind::Script).collect();
        assert_eq!(css, ["https://x.dev/a.css", "https://x.dev/c.css"]);
        assert_eq!(js, ["https://x.dev/b.js"]);
    }

    #[test]
    fn test_presets_are_valid() {
        let list = ResourceList::try_from_urls(PRESETS.iter().map(|p| p.url)).unwrap();
        assert_eq!(list.len(), PRESETS.len());
        assert_eq!(preset("JQUERY").unwrap().name, "jQuery");
        assert!(preset("left-pad").is_err());
    }
}
