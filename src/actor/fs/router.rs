//! Change set → job routing.
//!
//! Each category's watch patterns select the job that rebuilds it. A path
//! matching several categories triggers each of them; several paths matching
//! one category trigger it once.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::types::{ChangeKind, ChangeSet};
use crate::config::KilnConfig;
use crate::core::Job;

/// Jobs to run for a debounced change set, in job order.
pub(super) fn jobs_for(changes: &ChangeSet, config: &KilnConfig) -> Vec<Job> {
    let root = config.paths.root();
    let mut jobs = BTreeSet::new();

    for (path, kind) in changes {
        // Directory events carry no content change of their own
        if *kind != ChangeKind::Removed && path.is_dir() {
            continue;
        }
        let before = jobs.len();
        for (category, entry) in config.paths.iter().filter(|(_, e)| !e.watch.is_empty()) {
            if entry.watch.matches_path(path, root) {
                jobs.insert(Job::for_category(category));
            }
        }
        if jobs.len() == before {
            crate::debug!("watch"; "ignored {}: {}", kind.label(), path.display());
        }
    }

    jobs.into_iter().collect()
}

/// Directories to attach the watcher to, absolute and without nesting.
pub(super) fn watch_roots(config: &KilnConfig) -> Vec<PathBuf> {
    let root = config.paths.root();
    let mut dirs: Vec<PathBuf> = config
        .paths
        .iter()
        .flat_map(|(_, entry)| entry.watch.watch_dirs())
        .map(|dir| root.join(dir))
        .collect();

    dirs.sort();
    dirs.dedup();

    let mut roots: Vec<PathBuf> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        if !roots.iter().any(|r: &PathBuf| dir.starts_with(r)) {
            roots.push(dir);
        }
    }
    roots
}

/// One-line summary of a change set for the log.
pub(super) fn describe(changes: &ChangeSet, root: &Path) -> String {
    match changes.as_slice() {
        [(path, kind)] => format!(
            "{} {}",
            kind.label(),
            crate::utils::path::to_slash_relative(path, root)
        ),
        _ => crate::utils::plural::plural_count(changes.len(), "change"),
    }
}
