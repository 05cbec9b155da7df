//! Markup, styles and scripts: text pipelines.

use anyhow::{Context, Result};

use crate::config::KilnConfig;
use crate::core::{Category, JobReport};
use crate::debug;
use crate::pipeline::{Pipeline, Step, write_assets};

pub fn run(config: &KilnConfig, category: Category) -> Result<JobReport> {
    let entry = config.paths.get(category);
    let inputs = entry.src.expand(&config.root)?;
    debug!(category.name(); "{} matched {:?}", inputs.len(), entry.src);

    let pipeline = Pipeline::for_category(config, category)?;
    let assets = pipeline.run(&inputs)?;
    let written = write_assets(&assets, &entry.dest)?;

    // A map left over from a development build would no longer match
    if config.mode.is_production() {
        for step in pipeline.steps() {
            if let Step::Concat(name) = step {
                let map = entry.dest.join(format!("{name}.map"));
                if map.exists() {
                    std::fs::remove_file(&map)
                        .with_context(|| format!("Failed to remove {}", map.display()))?;
                }
            }
        }
    }

    Ok(JobReport::new(written, 0))
}
