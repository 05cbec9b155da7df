//! Mtime-based staleness filter.
//!
//! A source is stale when its destination copy is missing or older.
//! Equal mtimes count as fresh, so a copy that preserved the source
//! timestamp is never reprocessed.

use std::path::Path;
use std::time::SystemTime;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Check if file A is newer than file B
///
/// Returns `true` if A exists and is newer than B
/// Returns `false` if either file doesn't exist or times can't be compared
pub fn is_newer_than(a: &Path, b: &Path) -> bool {
    let (Some(a_time), Some(b_time)) = (get_mtime(a), get_mtime(b)) else {
        return false;
    };
    a_time > b_time
}

/// Check if `source` must be (re)written to `dest`.
pub fn needs_update(source: &Path, dest: &Path) -> bool {
    get_mtime(dest).is_none() || is_newer_than(source, dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_missing_dest_needs_update() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.png");
        fs::write(&src, "a").unwrap();
        assert!(needs_update(&src, &dir.path().join("out.png")));
    }

    #[test]
    fn test_newer_source_needs_update() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.png");
        let dest = dir.path().join("b.png");
        fs::write(&src, "a").unwrap();
        fs::write(&dest, "b").unwrap();

        let now = SystemTime::now();
        set_mtime(&dest, now - Duration::from_secs(60));
        set_mtime(&src, now);
        assert!(needs_update(&src, &dest));
    }

    #[test]
    fn test_equal_or_older_source_is_fresh() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.png");
        let dest = dir.path().join("b.png");
        fs::write(&src, "a").unwrap();
        fs::write(&dest, "b").unwrap();

        let now = SystemTime::now();
        set_mtime(&src, now);
        set_mtime(&dest, now);
        assert!(!needs_update(&src, &dest));

        set_mtime(&src, now - Duration::from_secs(60));
        assert!(!needs_update(&src, &dest));
    }

    #[test]
    fn test_is_newer_than_missing() {
        let dir = TempDir::new().unwrap();
        assert!(!is_newer_than(&dir.path().join("x"), &dir.path().join("y")));
    }
}
