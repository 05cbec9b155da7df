//! Image processing: lossless-first optimization and favicon generation.
//!
//! # Modules
//!
//! - [`optimize`]: the [`Optimizer`] seam and the default raster optimizer
//! - [`favicon`]: icon sets derived from one source image

pub mod favicon;
pub mod optimize;

pub use optimize::{Optimizer, RasterOptimizer};

use std::path::Path;

/// Extensions the raster optimizer and favicon generator can decode.
pub fn is_raster(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .is_some_and(|ext| matches!(ext.as_str(), "png" | "jpg" | "jpeg"))
}
