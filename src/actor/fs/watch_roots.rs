use std::path::PathBuf;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;

/// How often missing roots are retried while the watcher is otherwise idle.
const RETRY: Duration = Duration::from_secs(1);

/// Directories derived from the watch patterns.
///
/// Roots that do not exist yet (e.g. `src` in a fresh project, before the first
/// source is added) are attached once they appear; roots that vanish are dropped and
/// re-attached when recreated.
pub(super) struct WatchRoots {
    desired: Vec<PathBuf>,
    attached: FxHashSet<PathBuf>,
}

impl WatchRoots {
    pub(super) fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            desired: paths,
            attached: FxHashSet::default(),
        }
    }

    pub(super) fn attach_existing(&mut self, watcher: &mut RecommendedWatcher) -> notify::Result<()> {
        for path in self.desired.iter().filter(|p| p.exists()) {
            watcher.watch(path, RecursiveMode::Recursive)?;
            self.attached.insert(path.clone());
        }
        Ok(())
    }

    /// Some desired root is not attached yet.
    pub(super) fn has_missing(&self) -> bool {
        self.desired.iter().any(|path| !self.attached.contains(path))
    }

    /// Shorten `sleep` so missing roots are retried.
    pub(super) fn cap_sleep(&self, sleep: Duration) -> Duration {
        if self.has_missing() { sleep.min(RETRY) } else { sleep }
    }

    pub(super) fn maintain(&mut self, watcher: &mut RecommendedWatcher) {
        self.attached.retain(|path| path.exists());

        for path in &self.desired {
            if self.attached.contains(path) || !path.exists() {
                continue;
            }
            if watcher.watch(path, RecursiveMode::Recursive).is_ok() {
                self.attached.insert(path.clone());
                crate::debug!("watch"; "attached watch: {}", path.display());
            }
        }
    }
}

#[cfg(test)]
impl WatchRoots {
    pub(super) fn desired(&self) -> &[PathBuf] {
        &self.desired
    }
}
