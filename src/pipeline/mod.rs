//! Text asset pipelines.
//!
//! A pipeline is an ordered list of [`Step`]s chosen once from the asset
//! category and the build mode:
//!
//! ```text
//! styles   Preprocess → Include → Autoprefix → Concat → SourceMap | MinifyCss
//! scripts  Concat → SourceMap | MinifyJs
//! markup   Include → (CollapseWhitespace)
//! ```
//!
//! Running a pipeline is pure apart from reading sources and invoking the
//! style compiler: nothing is written until every step has succeeded.

pub mod asset;
mod include;
mod minify;
mod sourcemap;
mod style;

pub use asset::Asset;
pub use include::expand_includes;
pub use minify::{collapse_whitespace, minify_css, minify_js};
pub use style::Compilers;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lightningcss::targets::Targets;
use rayon::prelude::*;

use crate::config::KilnConfig;
use crate::core::Category;
use crate::pattern::Matched;

/// One transformation applied to the assets of a job.
#[derive(Debug, Clone)]
pub enum Step {
    /// Compile `.scss`/`.sass`/`.less` through the external compiler.
    Preprocess(Compilers),
    /// Expand include directives.
    Include,
    /// Add vendor prefixes for the given browsers.
    Autoprefix(Targets),
    /// Join everything into one asset with this name.
    Concat(String),
    /// Write `<name>.map` and reference it from the asset.
    SourceMap,
    MinifyCss,
    MinifyJs,
    CollapseWhitespace,
}

impl Step {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Preprocess(_) => "preprocess",
            Self::Include => "include",
            Self::Autoprefix(_) => "autoprefix",
            Self::Concat(_) => "concat",
            Self::SourceMap => "sourcemap",
            Self::MinifyCss => "minify-css",
            Self::MinifyJs => "minify-js",
            Self::CollapseWhitespace => "collapse-whitespace",
        }
    }
}

/// Steps for one category in one mode.
#[derive(Debug, Clone)]
pub struct Pipeline {
    root: PathBuf,
    steps: Vec<Step>,
}

impl Pipeline {
    /// Assemble the pipeline for `category` under the configured mode.
    ///
    /// Binary categories (images, fonts, favicon) have no text steps.
    pub fn for_category(config: &KilnConfig, category: Category) -> Result<Self> {
        let dev = config.mode.is_dev();
        let steps = match category {
            Category::Styles => vec![
                Step::Preprocess(Compilers {
                    sass: config.styles.sass.clone(),
                    less: config.styles.less.clone(),
                }),
                Step::Include,
                Step::Autoprefix(style::resolve_targets(&config.styles.targets)?),
                Step::Concat(config.styles.output.clone()),
                if dev { Step::SourceMap } else { Step::MinifyCss },
            ],
            Category::Scripts => vec![
                Step::Concat(config.scripts.output.clone()),
                if dev { Step::SourceMap } else { Step::MinifyJs },
            ],
            Category::Markup if dev => vec![Step::Include],
            Category::Markup => vec![Step::Include, Step::CollapseWhitespace],
            Category::Images | Category::Fonts | Category::Favicon => Vec::new(),
        };

        Ok(Self {
            root: config.root.clone(),
            steps,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Read `inputs` and run every step over them.
    ///
    /// No inputs produce no assets.
    pub fn run(&self, inputs: &[Matched]) -> Result<Vec<Asset>> {
        let mut assets = inputs
            .par_iter()
            .map(Asset::read)
            .collect::<Result<Vec<_>>>()?;
        if assets.is_empty() {
            return Ok(assets);
        }

        for step in &self.steps {
            assets = self.apply(step, assets)?;
        }
        Ok(assets)
    }

    fn apply(&self, step: &Step, mut assets: Vec<Asset>) -> Result<Vec<Asset>> {
        match step {
            Step::Preprocess(compilers) => {
                assets
                    .par_iter_mut()
                    .try_for_each(|asset| style::preprocess(asset, compilers))?;
            }
            Step::Include => {
                assets.par_iter_mut().try_for_each(|asset| -> Result<()> {
                    let expanded = expand_includes(&asset.content, asset.source())?;
                    asset.set_content(expanded);
                    Ok(())
                })?;
            }
            Step::Autoprefix(targets) => {
                assets.par_iter_mut().try_for_each(|asset| -> Result<()> {
                    let prefixed = style::autoprefix(&asset.content, &display(asset), *targets)?;
                    asset.set_content(prefixed);
                    Ok(())
                })?;
            }
            Step::Concat(name) => {
                assets = vec![asset::concat(assets, name)];
            }
            Step::SourceMap => {
                let maps: Vec<Asset> = assets
                    .iter_mut()
                    .map(|asset| sourcemap::attach(asset, &self.root))
                    .collect();
                assets.extend(maps);
            }
            Step::MinifyCss => {
                for asset in &mut assets {
                    asset.content = minify_css(&asset.content, &display(asset))?;
                }
            }
            Step::MinifyJs => {
                for asset in &mut assets {
                    asset.content = minify_js(&asset.content, &display(asset))?;
                }
            }
            Step::CollapseWhitespace => {
                assets
                    .par_iter_mut()
                    .for_each(|asset| asset.content = collapse_whitespace(&asset.content));
            }
        }
        Ok(assets)
    }
}

fn display(asset: &Asset) -> String {
    asset.relative.display().to_string()
}

/// Write assets under `dest`, creating directories as needed.
pub fn write_assets(assets: &[Asset], dest: &Path) -> Result<usize> {
    for asset in assets {
        let path = dest.join(&asset.relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&path, &asset.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(assets.len())
}
