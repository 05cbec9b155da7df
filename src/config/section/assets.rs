//! `[styles]`, `[scripts]` and `[images]` sections.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! output = "main.min.css"
//! sass = ["npx", "sass", "--no-source-map"]
//! targets = ["last 10 versions"]
//!
//! [images]
//! jpeg_quality = 80
//! ```

use serde::{Deserialize, Serialize};

/// Style job options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Name of the combined stylesheet.
    pub output: String,
    /// Compiler for `.scss`/`.sass` files; the source path is appended.
    pub sass: Vec<String>,
    /// Compiler for `.less` files; the source path is appended.
    pub less: Vec<String>,
    /// Browserslist queries used for vendor prefixing.
    pub targets: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            output: "main.min.css".into(),
            sass: vec!["sass".into(), "--no-source-map".into()],
            less: vec!["lessc".into()],
            targets: vec!["last 10 versions".into()],
        }
    }
}

/// Script job options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Name of the combined script.
    pub output: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            output: "main.min.js".into(),
        }
    }
}

/// Image job options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// JPEG re-encode quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self { jpeg_quality: 85 }
    }
}
