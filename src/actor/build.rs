//! Build Actor
//!
//! Runs the jobs of one change set on the blocking pool, reports the outcome
//! through `WatchStatus`, and tells the browser what to refresh.
//!
//! Only jobs that succeeded contribute a notification. Any page-level change
//! wins over CSS injection, and a batch never sends more than one message.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use super::messages::{BuildMsg, WsMsg};
use crate::config::KilnConfig;
use crate::core::{Category, Job};
use crate::logger::{status_error, status_success};
use crate::utils::path::to_slash_relative;

/// What connected browsers need after a job succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notify {
    Reload,
    InjectCss,
    None,
}

impl Notify {
    pub const fn for_job(job: Job) -> Self {
        match job {
            Job::Markup | Job::Scripts | Job::Favicon => Self::Reload,
            Job::Styles => Self::InjectCss,
            Job::Images | Job::Fonts | Job::CleanImages | Job::CleanDist => Self::None,
        }
    }
}

pub struct BuildActor {
    rx: mpsc::Receiver<BuildMsg>,
    ws_tx: mpsc::Sender<WsMsg>,
    config: Arc<KilnConfig>,
}

impl BuildActor {
    pub fn new(rx: mpsc::Receiver<BuildMsg>, ws_tx: mpsc::Sender<WsMsg>, config: Arc<KilnConfig>) -> Self {
        Self { rx, ws_tx, config }
    }

    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            match msg {
                BuildMsg::Run { jobs } => {
                    let Some(notification) = self.run_batch(jobs).await else {
                        continue;
                    };
                    if self.ws_tx.send(notification).await.is_err() {
                        break;
                    }
                }
                BuildMsg::Shutdown => {
                    crate::debug!("build"; "shutting down");
                    break;
                }
            }
        }
    }

    /// Run one batch; returns the notification to send, if any.
    async fn run_batch(&self, jobs: Vec<Job>) -> Option<WsMsg> {
        let started = Instant::now();

        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let config = Arc::clone(&self.config);
                (job, tokio::task::spawn_blocking(move || crate::jobs::run(job, &config)))
            })
            .collect();

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for (job, handle) in handles {
            match handle.await {
                Ok(Ok(report)) => {
                    crate::debug!(job.name(); "{}", report.summary());
                    succeeded.push(job);
                }
                Ok(Err(e)) => failed.push((job, format!("{e:#}"))),
                Err(e) => failed.push((job, e.to_string())),
            }
        }

        let elapsed = started.elapsed();
        if failed.is_empty() {
            status_success(&format!("rebuilt: {} ({elapsed:.0?})", job_names(&succeeded)));
        } else {
            let names: Vec<Job> = failed.iter().map(|(job, _)| *job).collect();
            let detail: Vec<&str> = failed.iter().map(|(_, e)| e.as_str()).collect();
            status_error(&format!("{} failed", job_names(&names)), &detail.join("\n"));
        }

        notification(&succeeded, &self.config)
    }
}

/// Pick the single message a set of successful jobs calls for.
pub fn notification(succeeded: &[Job], config: &KilnConfig) -> Option<WsMsg> {
    let reloads: Vec<Job> = succeeded
        .iter()
        .copied()
        .filter(|job| Notify::for_job(*job) == Notify::Reload)
        .collect();

    if !reloads.is_empty() {
        return Some(WsMsg::Reload {
            reason: format!("{} rebuilt", job_names(&reloads)),
        });
    }

    succeeded
        .iter()
        .any(|job| Notify::for_job(*job) == Notify::InjectCss)
        .then(|| WsMsg::Css {
            path: stylesheet_url(config),
        })
}

/// URL of the combined stylesheet as served from the build root.
fn stylesheet_url(config: &KilnConfig) -> String {
    let file = config.paths.get(Category::Styles).dest.join(&config.styles.output);
    format!("/{}", to_slash_relative(&file, config.paths.build_dir()))
}

fn job_names(jobs: &[Job]) -> String {
    jobs.iter().map(|job| job.name()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BuildMode;
    use crate::jobs::testing::{config, touch};
    use tempfile::TempDir;

    async fn run_jobs(config: KilnConfig, jobs: Vec<Job>) -> Vec<WsMsg> {
        let (build_tx, build_rx) = mpsc::channel(4);
        let (ws_tx, mut ws_rx) = mpsc::channel(4);
        let actor = BuildActor::new(build_rx, ws_tx, Arc::new(config));

        build_tx.send(BuildMsg::Run { jobs }).await.unwrap();
        build_tx.send(BuildMsg::Shutdown).await.unwrap();
        actor.run().await;

        let mut messages = Vec::new();
        while let Ok(msg) = ws_rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    #[test]
    fn test_notify_table() {
        assert_eq!(Notify::for_job(Job::Scripts), Notify::Reload);
        assert_eq!(Notify::for_job(Job::Styles), Notify::InjectCss);
        assert_eq!(Notify::for_job(Job::Markup), Notify::Reload);
        assert_eq!(Notify::for_job(Job::Images), Notify::None);
    }

    #[test]
    fn test_reload_wins_over_css() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), BuildMode::Development);

        let msg = notification(&[Job::Styles, Job::Markup, Job::Scripts], &config);
        match msg {
            Some(WsMsg::Reload { reason }) => assert_eq!(reason, "html, js rebuilt"),
            other => panic!("expected reload, got {other:?}"),
        }
    }

    #[test]
    fn test_css_only_injects_stylesheet() {
        let dir = TempDir::new().unwrap();
        let config = config(dir.path(), BuildMode::Development);

        match notification(&[Job::Styles], &config) {
            Some(WsMsg::Css { path }) => assert_eq!(path, "/css/main.min.css"),
            other => panic!("expected css, got {other:?}"),
        }
        assert!(notification(&[Job::Images], &config).is_none());
        assert!(notification(&[], &config).is_none());
    }

    #[tokio::test]
    async fn test_markup_change_sends_one_reload() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/pages/index.html", "<p>hi</p>\n");
        let config = config(dir.path(), BuildMode::Development);
        let out = config.paths.get(Category::Markup).dest.join("index.html");

        let messages = run_jobs(config, vec![Job::Markup]).await;

        assert_eq!(messages.len(), 1);
        assert!(matches!(messages[0], WsMsg::Reload { .. }));
        assert!(out.is_file());
    }

    #[tokio::test]
    async fn test_failed_job_sends_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/css/main.css", "/*= missing.css */\n");
        let config = config(dir.path(), BuildMode::Development);
        let out = config.paths.get(Category::Styles).dest.join("main.min.css");

        let messages = run_jobs(config, vec![Job::Styles]).await;

        assert!(messages.is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_images_send_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/img/icon.svg", "<svg/>");
        let config = config(dir.path(), BuildMode::Development);

        let messages = run_jobs(config, vec![Job::Images]).await;
        assert!(messages.is_empty());
    }
}
