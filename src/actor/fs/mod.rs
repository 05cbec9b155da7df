//! FileSystem Actor
//!
//! Watches the directories behind every watch pattern and sends one
//! `BuildMsg::Run` per debounced change set.
//!
//! ```text
//! Watcher → Debouncer (timing) → router (watch patterns → jobs) → BuildMsg
//! ```
//!
//! The watcher is attached in `new`, so events raised while the caller runs
//! the initial build are buffered rather than lost.

use std::path::PathBuf;
use std::sync::Arc;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::BuildMsg;
use crate::config::KilnConfig;

// Raw event coalescing.
mod debouncer;
// Watch patterns → jobs.
mod router;
// Shared fs event types.
mod types;
// Watch root attach/re-attach lifecycle.
mod watch_roots;


use debouncer::Debouncer;
use watch_roots::WatchRoots;

/// FileSystem Actor - watches for file changes
pub struct FsActor {
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: std::sync::mpsc::Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (must be kept alive)
    watcher: RecommendedWatcher,
    watch_roots: WatchRoots,
    build_tx: mpsc::Sender<BuildMsg>,
    debouncer: Debouncer,
    config: Arc<KilnConfig>,
}

impl FsActor {
    pub fn new(build_tx: mpsc::Sender<BuildMsg>, config: Arc<KilnConfig>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let mut watch_roots = WatchRoots::new(router::watch_roots(&config));
        watch_roots.attach_existing(&mut watcher)?;

        Ok(Self {
            notify_rx,
            watcher,
            watch_roots,
            build_tx,
            debouncer: Debouncer::new(),
            config,
        })
    }

    /// Absolute directories this actor watches.
    pub fn roots(config: &KilnConfig) -> Vec<PathBuf> {
        router::watch_roots(config)
    }

    /// Run the actor event loop
    pub async fn run(self) {
        let Self {
            notify_rx,
            mut watcher,
            mut watch_roots,
            build_tx,
            mut debouncer,
            config,
        } = self;

        let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

        // notify delivers on a std channel; bridge it into tokio
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        loop {
            tokio::select! {
                biased;
                Some(event) = async_rx.recv() => debouncer.add_event(&event),
                _ = tokio::time::sleep(watch_roots.cap_sleep(debouncer.sleep_duration())) => {
                    watch_roots.maintain(&mut watcher);
                    if dispatch(&mut debouncer, &build_tx, &config).await.is_err() {
                        break;
                    }
                }
            }
        }
    }
}

/// Route a ready change set to the build actor.
///
/// Returns `Err(())` once the build actor has shut down.
async fn dispatch(
    debouncer: &mut Debouncer,
    build_tx: &mpsc::Sender<BuildMsg>,
    config: &KilnConfig,
) -> Result<(), ()> {
    let Some(changes) = debouncer.take_if_ready() else {
        return Ok(());
    };

    let jobs = router::jobs_for(&changes, config);
    if jobs.is_empty() {
        return Ok(());
    }

    crate::log!("watch"; "{}", router::describe(&changes, config.paths.root()));
    build_tx.send(BuildMsg::Run { jobs }).await.map_err(|_| ())
}
