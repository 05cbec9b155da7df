//! Images and fonts: per-file copies with a staleness filter.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::config::{KilnConfig, PathEntry};
use crate::core::{Category, JobReport};
use crate::debug;
use crate::freshness::needs_update;
use crate::image::Optimizer;

/// Optimize images whose destination copy is missing or older.
pub fn images(config: &KilnConfig, optimizer: &dyn Optimizer) -> Result<JobReport> {
    let entry = config.paths.get(Category::Images);
    copy_stale(config, entry, |path, bytes| optimizer.optimize(path, bytes))
}

/// Copy fonts whose destination copy is missing or older.
pub fn fonts(config: &KilnConfig) -> Result<JobReport> {
    let entry = config.paths.get(Category::Fonts);
    copy_stale(config, entry, |_, bytes| Ok(bytes))
}

fn copy_stale<F>(config: &KilnConfig, entry: &PathEntry, transform: F) -> Result<JobReport>
where
    F: Fn(&Path, Vec<u8>) -> Result<Vec<u8>> + Sync,
{
    let matched = entry.src.expand(&config.root)?;
    let stale: Vec<_> = matched
        .iter()
        .filter(|m| needs_update(&m.path, &entry.dest.join(&m.relative)))
        .collect();
    debug!("copy"; "{} of {} stale for {}", stale.len(), matched.len(), entry.dest.display());

    stale.par_iter().try_for_each(|m| -> Result<()> {
        let dest = entry.dest.join(&m.relative);
        let bytes = fs::read(&m.path).with_context(|| format!("Failed to read {}", m.path.display()))?;
        let bytes = transform(&m.path, bytes)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dest, bytes).with_context(|| format!("Failed to write {}", dest.display()))
    })?;

    Ok(JobReport::new(stale.len(), matched.len() - stale.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BuildMode;
    use crate::jobs::testing::{config, touch};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingOptimizer {
        calls: AtomicUsize,
    }

    impl Optimizer for CountingOptimizer {
        fn optimize(&self, _path: &Path, bytes: Vec<u8>) -> Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(bytes)
        }
    }

    #[test]
    fn test_images_second_run_skips_everything() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/img/logo.svg", "<svg/>");
        touch(dir.path(), "src/img/photos/a.gif", "GIF89a");
        let config = config(dir.path(), BuildMode::Development);
        let optimizer = CountingOptimizer::default();

        let first = images(&config, &optimizer).unwrap();
        assert_eq!(first, JobReport::new(2, 0));
        assert_eq!(optimizer.calls.load(Ordering::SeqCst), 2);
        assert!(dir.path().join("build/img/photos/a.gif").exists());

        let second = images(&config, &optimizer).unwrap();
        assert_eq!(second, JobReport::new(0, 2));
        assert_eq!(optimizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_images_reprocesses_missing_destination() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/img/a.svg", "<svg/>");
        let config = config(dir.path(), BuildMode::Development);
        let optimizer = CountingOptimizer::default();

        images(&config, &optimizer).unwrap();
        fs::remove_file(dir.path().join("build/img/a.svg")).unwrap();
        let report = images(&config, &optimizer).unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(optimizer.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fonts_copied_verbatim() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/fonts/roboto/regular.woff2", b"wOF2\x00\x01");
        let config = config(dir.path(), BuildMode::Production);

        let report = fonts(&config).unwrap();
        assert_eq!(report.written, 1);
        assert_eq!(
            fs::read(dir.path().join("build/fonts/roboto/regular.woff2")).unwrap(),
            b"wOF2\x00\x01"
        );
        assert_eq!(fonts(&config).unwrap(), JobReport::new(0, 1));
    }

    #[test]
    fn test_missing_source_dir_is_empty_report() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), BuildMode::Development);
        assert_eq!(fonts(&config).unwrap(), JobReport::default());
    }
}
