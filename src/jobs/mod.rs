//! Job execution.
//!
//! Every job reads its row of the path table, transforms what matched and
//! writes into its destination. Jobs never touch each other's outputs, so
//! the build jobs can run concurrently.
//!
//! | Job                         | Module     |
//! |-----------------------------|------------|
//! | markup, styles, scripts     | `bundle`   |
//! | images, fonts               | `files`    |
//! | favicon                     | `favicon`  |
//! | clean-img, clean-dist       | `clean`    |

mod bundle;
mod clean;
mod favicon;
mod files;

use std::time::Instant;

use anyhow::{Context, Result};

use crate::config::KilnConfig;
use crate::core::{Category, Job, JobReport};
use crate::image::RasterOptimizer;
use crate::log;

/// Run one job to completion.
pub fn run(job: Job, config: &KilnConfig) -> Result<JobReport> {
    match job {
        Job::Markup => bundle::run(config, Category::Markup),
        Job::Styles => bundle::run(config, Category::Styles),
        Job::Scripts => bundle::run(config, Category::Scripts),
        Job::Images => {
            let optimizer = RasterOptimizer::new(config.images.jpeg_quality);
            files::images(config, &optimizer)
        }
        Job::Fonts => files::fonts(config),
        Job::Favicon => favicon::run(config),
        Job::CleanImages => clean::clean_dir(&config.paths.get(Category::Images).dest),
        Job::CleanDist => clean::clean_dir(config.paths.build_dir()),
    }
}

/// Run one job and log its report under the job's name.
pub fn run_logged(job: Job, config: &KilnConfig) -> Result<JobReport> {
    let start = Instant::now();
    let report = run(job, config).with_context(|| format!("`{job}` failed"))?;
    log!(job.name(); "{} ({:.0?})", report.summary(), start.elapsed());
    Ok(report)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::fs;
    use std::path::Path;

    use crate::config::{KilnConfig, test_parse_config};
    use crate::core::BuildMode;

    pub fn touch(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Config rooted at `root` with plain-CSS styles (no external compiler).
    pub fn config(root: &Path, mode: BuildMode) -> KilnConfig {
        let file = test_parse_config("[paths.styles]\nsrc = [\"src/css/**/*.css\"]");
        KilnConfig::resolve(file, root, mode).unwrap()
    }
}
