//! Path normalization utilities.

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Path of `path` relative to `root`, with forward slashes.
///
/// Returns the path unchanged (as a string) when it is not under `root`.
pub fn to_slash_relative(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Check that a relative path stays inside its base (no `..`, no absolute root).
pub fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        assert!(normalize_path(path).is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        assert!(normalize_path(path).is_absolute());
    }

    #[test]
    fn test_to_slash_relative() {
        let root = Path::new("/site");
        assert_eq!(
            to_slash_relative(Path::new("/site/src/pages/index.html"), root),
            "src/pages/index.html"
        );
        assert_eq!(to_slash_relative(Path::new("/site"), root), "");
    }

    #[test]
    fn test_is_contained() {
        assert!(is_contained(Path::new("build/css")));
        assert!(is_contained(Path::new("./build")));
        assert!(!is_contained(Path::new("../outside")));
        assert!(!is_contained(Path::new("/abs/path")));
    }
}
