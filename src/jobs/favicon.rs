//! Favicon job: icon set from the first raster source.

use anyhow::Result;

use crate::config::KilnConfig;
use crate::core::{Category, JobReport};
use crate::image::{favicon, is_raster};
use crate::log;

pub fn run(config: &KilnConfig) -> Result<JobReport> {
    let entry = config.paths.get(Category::Favicon);
    let matched = entry.src.expand(&config.root)?;

    let Some(source) = matched.iter().find(|m| is_raster(&m.path)) else {
        return Ok(JobReport::default());
    };
    if matched.len() > 1 {
        log!("favicon"; "using {}", config.root_relative(&source.path).display());
    }

    let written = favicon::generate(&source.path, &entry.dest)?;
    Ok(JobReport::new(written.len(), 0))
}
