//! Actor Coordinator - wires up the watch actor system
//!
//! Creates the channels, starts the reload listener's acceptor, spawns the
//! actors and runs them until the shutdown signal arrives.
//!
//! ```text
//! FsActor --BuildMsg--> BuildActor --WsMsg--> WsActor
//!                                               ^
//!                       ReloadListener --AddClient
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use crossbeam::channel::Receiver;
use tokio::sync::mpsc;

use super::build::BuildActor;
use super::fs::FsActor;
use super::messages::{BuildMsg, WsMsg};
use super::ws::WsActor;
use crate::config::KilnConfig;
use crate::reload::server::ReloadListener;

/// Channel buffer size
const CHANNEL_BUFFER: usize = 32;

pub struct Coordinator {
    config: Arc<KilnConfig>,
    reload: Option<ReloadListener>,
    shutdown_rx: Option<Receiver<()>>,
}

impl Coordinator {
    pub fn with_config(config: Arc<KilnConfig>) -> Self {
        Self {
            config,
            reload: None,
            shutdown_rx: None,
        }
    }

    /// Accept browser clients on an already bound listener.
    pub fn with_reload(mut self, listener: ReloadListener) -> Self {
        self.reload = Some(listener);
        self
    }

    pub fn with_shutdown_signal(mut self, rx: Receiver<()>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    /// Run the actor system
    pub async fn run(self) -> Result<()> {
        let (build_tx, build_rx) = mpsc::channel::<BuildMsg>(CHANNEL_BUFFER);
        let (ws_tx, ws_rx) = mpsc::channel::<WsMsg>(CHANNEL_BUFFER);

        if let Some(listener) = self.reload {
            listener.spawn_acceptor(ws_tx.clone())?;
        }

        let fs = FsActor::new(build_tx.clone(), Arc::clone(&self.config))
            .map_err(|e| anyhow!("watcher failed: {}", e))?;
        for root in FsActor::roots(&self.config) {
            crate::debug!("watch"; "watching {}", root.display());
        }
        let build = BuildActor::new(build_rx, ws_tx.clone(), Arc::clone(&self.config));
        let ws = WsActor::new(ws_rx);

        crate::log!("watch"; "watching for changes");
        run_actors(fs, build, ws, build_tx, ws_tx, self.shutdown_rx).await;
        crate::debug!("actor"; "stopped");
        Ok(())
    }
}

async fn run_actors(
    fs: FsActor,
    build: BuildActor,
    ws: WsActor,
    build_tx: mpsc::Sender<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    shutdown_rx: Option<Receiver<()>>,
) {
    let fs_handle = tokio::spawn(fs.run());
    let build_handle = tokio::spawn(build.run());
    let ws_handle = tokio::spawn(ws.run());

    match shutdown_rx {
        // crossbeam receiver: poll instead of blocking a worker
        Some(rx) => loop {
            if rx.try_recv().is_ok() || crate::core::is_shutdown() {
                crate::debug!("actor"; "shutdown signal received");
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        },
        None => {
            tokio::select! {
                _ = fs_handle => {}
                _ = build_handle => {}
                _ = ws_handle => {}
            }
            return;
        }
    }

    // Let an in-flight rebuild finish and close client sockets
    let _ = build_tx.send(BuildMsg::Shutdown).await;
    let _ = ws_tx.send(WsMsg::Shutdown).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), build_handle).await;
    let _ = tokio::time::timeout(Duration::from_millis(500), ws_handle).await;
    fs_handle.abort();
}
