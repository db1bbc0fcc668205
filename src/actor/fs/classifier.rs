use std::path::PathBuf;

use rustc_hash::FxHashMap;

use super::debouncer::ChangeKind;
use crate::config::PlaygroundConfig;
use crate::store::BufferKind;
use crate::utils::path::normalize_path;

/// Settled file changes, sorted into what they mean for the playground.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct FsChanges {
    /// Buffers whose file changed, in pane order.
    pub(super) buffers: Vec<BufferKind>,
    pub(super) config: bool,
}

impl FsChanges {
    pub(super) fn is_empty(&self) -> bool {
        self.buffers.is_empty() && !self.config
    }
}

/// Map changed paths onto buffers and the config file. Everything else in
/// the watched directories is ignored.
///
/// A removed source file still counts: its buffer becomes empty.
pub(super) fn classify(changes: FxHashMap<PathBuf, ChangeKind>, config: &PlaygroundConfig) -> FsChanges {
    let config_path = normalize_path(&config.config_path);
    let mut touched = Vec::new();
    let mut config_changed = false;

    for (path, kind) in changes {
        if path == config_path {
            if kind != ChangeKind::Removed {
                config_changed = true;
            }
            continue;
        }
        if let Some(buffer) = config.buffer_for_path(&path) {
            crate::debug!("watch"; "{} {} ({})", buffer, kind.label(), config.root_relative(&path).display());
            touched.push(buffer);
        }
    }

    FsChanges {
        buffers: BufferKind::ALL.into_iter().filter(|kind| touched.contains(kind)).collect(),
        config: config_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlaygroundConfig {
        let mut config = PlaygroundConfig::default();
        config.root = PathBuf::from("/play");
        config.config_path = PathBuf::from("/play/livepad.toml");
        config
    }

    fn changes(entries: &[(&str, ChangeKind)]) -> FxHashMap<PathBuf, ChangeKind> {
        entries.iter().map(|(p, k)| (PathBuf::from(p), *k)).collect()
    }

    #[test]
    fn test_sources_map_to_buffers_in_pane_order() {
        let result = classify(
            changes(&[
                ("/play/script.js", ChangeKind::Modified),
                ("/play/index.html", ChangeKind::Created),
                ("/play/notes.md", ChangeKind::Modified),
            ]),
            &config(),
        );
        assert_eq!(result.buffers, [BufferKind::Html, BufferKind::Js]);
        assert!(!result.config);
    }

    #[test]
    fn test_removed_source_still_reloads() {
        let result = classify(changes(&[("/play/style.css", ChangeKind::Removed)]), &config());
        assert_eq!(result.buffers, [BufferKind::Css]);
    }

    #[test]
    fn test_config_change() {
        let result = classify(changes(&[("/play/livepad.toml", ChangeKind::Modified)]), &config());
        assert!(result.config);
        assert!(result.buffers.is_empty());

        let removed = classify(changes(&[("/play/livepad.toml", ChangeKind::Removed)]), &config());
        assert!(removed.is_empty());
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let result = classify(changes(&[("/elsewhere/index.html", ChangeKind::Modified)]), &config());
        assert!(result.is_empty());
    }
}
