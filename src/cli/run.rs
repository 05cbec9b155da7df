//! Command dispatch: one-shot jobs, the aggregate build and the dev flow.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, bail};
use parking_lot::Mutex;

use super::Commands;
use super::serve::bind_server;
use crate::config::KilnConfig;
use crate::core::Job;
use crate::jobs;
use crate::log;
use crate::utils::plural::plural_count;

/// Run one parsed command to completion.
pub fn run(command: Commands, config: Arc<KilnConfig>) -> Result<()> {
    match command {
        Commands::Dev { .. } => dev(config),
        Commands::Build => build_all(&config),
        Commands::Serve { .. } => serve(config, false),
        Commands::Watch { .. } => serve(config, true),
        other => match other.job() {
            Some(job) => jobs::run_logged(job, &config).map(|_| ()),
            None => bail!("unsupported command: {other:?}"),
        },
    }
}

/// Clean the build root, then run every category job concurrently.
///
/// Every job runs even when another fails; the errors are reported together.
pub fn build_all(config: &KilnConfig) -> Result<()> {
    let started = Instant::now();
    jobs::run_logged(Job::CleanDist, config)?;

    let errors = Mutex::new(Vec::new());
    rayon::scope(|s| {
        for job in Job::BUILD {
            let errors = &errors;
            s.spawn(move |_| {
                if let Err(e) = jobs::run_logged(job, config) {
                    errors.lock().push(e);
                }
            });
        }
    });

    let errors = errors.into_inner();
    for e in &errors {
        log!("error"; "{e:#}");
    }
    if !errors.is_empty() {
        bail!("{} failed", plural_count(errors.len(), "job"));
    }

    log!("build"; "done in {:.0?} ({} mode)", started.elapsed(), config.mode);
    Ok(())
}

/// Build everything, then serve and watch. A failed build still starts both.
fn dev(config: Arc<KilnConfig>) -> Result<()> {
    if let Err(e) = build_all(&config) {
        log!("error"; "initial build failed: {e:#}");
    }
    serve(config, true)
}

fn serve(config: Arc<KilnConfig>, watch: bool) -> Result<()> {
    bind_server(config, watch)?.run()
}
