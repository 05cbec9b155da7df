//! Cleanup jobs: empty a destination directory.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::core::JobReport;

/// Remove every entry inside `dir`, keeping `dir` itself.
///
/// A missing directory is already clean. Every entry is attempted before
/// failing on the first error.
pub fn clean_dir(dir: &Path) -> Result<JobReport> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(JobReport::default()),
        Err(e) => return Err(e).with_context(|| format!("Failed to read {}", dir.display())),
    };

    let mut removed = 0;
    let mut failures = Vec::new();
    for entry in entries {
        let result = entry.and_then(|entry| {
            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            let result = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            result.map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))
        });
        match result {
            Ok(()) => removed += 1,
            Err(e) => failures.push(e.to_string()),
        }
    }

    if !failures.is_empty() {
        bail!(
            "failed to clean {} ({} removed):\n{}",
            dir.display(),
            removed,
            failures.join("\n")
        );
    }
    Ok(JobReport::new(removed, 0))
}
