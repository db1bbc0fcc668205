//! Path normalization.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`). For paths that
/// do not exist (a file just deleted by an editor) falls back to a lexical
/// clean-up joined onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        };
        clean(&absolute)
    })
}

/// Remove `.` and resolve `..` without touching the filesystem.
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative_is_absolute() {
        assert!(normalize_path(Path::new("relative/path/file.txt")).is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_missing_path_lexically() {
        assert_eq!(
            normalize_path(Path::new("/no-such-livepad/./a/../index.html")),
            PathBuf::from("/no-such-livepad/index.html")
        );
    }

    #[test]
    fn test_normalize_existing_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("style.css");
        std::fs::write(&file, "").unwrap();
        let dotted = dir.path().join(".").join("style.css");
        assert_eq!(normalize_path(&dotted), normalize_path(&file));
    }
}
