//! Project configuration for `kiln.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [styles], [scripts], [images]
//! │   ├── paths      # [paths] and the resolved PathTable
//! │   └── serve      # [serve]
//! ├── error.rs       # ConfigError
//! ├── util.rs        # Config file discovery
//! └── mod.rs         # KilnConfig (this file)
//! ```
//!
//! The file is optional: without one, the built-in path table is used with
//! the current directory as project root. The resolved [`KilnConfig`] is
//! immutable and shared as `Arc<KilnConfig>`.

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{ImagesConfig, PathEntry, PathTable, ScriptsConfig, ServeConfig, StylesConfig};

use section::PathsConfig;
use util::find_config_file;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::core::BuildMode;
use crate::{debug, log};
use crate::utils::path::normalize_path;

// ============================================================================
// raw file
// ============================================================================

/// `kiln.toml` as written on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub paths: PathsConfig,
    pub styles: StylesConfig,
    pub scripts: ScriptsConfig,
    pub images: ImagesConfig,
    pub serve: ServeConfig,
}

impl ConfigFile {
    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Load from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {field}");
    }
}

// ============================================================================
// resolved configuration
// ============================================================================

/// Resolved, immutable project configuration.
#[derive(Debug, Clone)]
pub struct KilnConfig {
    /// Project root: the config file's directory, or cwd without one.
    pub root: PathBuf,
    /// Config file in use, if any.
    pub config_path: Option<PathBuf>,
    pub mode: BuildMode,
    pub paths: PathTable,
    pub styles: StylesConfig,
    pub scripts: ScriptsConfig,
    pub images: ImagesConfig,
    pub serve: ServeConfig,
}

impl KilnConfig {
    /// Load configuration for the parsed command line.
    ///
    /// Searches upward from cwd for the config file. CLI server flags
    /// override the `[serve]` section.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (file, root, config_path) = match find_config_file(&cli.config) {
            Some(path) => {
                let root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                (ConfigFile::from_path(&path)?, root, Some(path))
            }
            None => {
                debug!("config"; "no {} found, using defaults", cli.config.display());
                (ConfigFile::default(), cwd, None)
            }
        };

        // Watch events arrive canonicalized; the root must match them
        let root = normalize_path(&root);
        let mut config = Self::resolve(file, &root, cli.mode())?;
        config.config_path = config_path;

        if let Some(args) = cli.serve_args() {
            if let Some(interface) = args.interface {
                config.serve.interface = interface;
            }
            if let Some(port) = args.port {
                config.serve.port = port;
            }
        }

        Ok(config)
    }

    /// Resolve a parsed file against a project root.
    pub fn resolve(file: ConfigFile, root: &Path, mode: BuildMode) -> Result<Self, ConfigError> {
        let paths = PathTable::resolve(&file.paths, root)?;
        let config = Self {
            root: root.to_path_buf(),
            config_path: None,
            mode,
            paths,
            styles: file.styles,
            scripts: file.scripts,
            images: file.images,
            serve: file.serve,
        };
        config.validate()?;
        Ok(config)
    }

    /// Built-in configuration rooted at `root`.
    #[cfg(test)]
    pub fn with_defaults(root: &Path, mode: BuildMode) -> Result<Self, ConfigError> {
        Self::resolve(ConfigFile::default(), root, mode)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        for (key, name) in [
            ("styles.output", &self.styles.output),
            ("scripts.output", &self.scripts.output),
        ] {
            let path = Path::new(name);
            if name.is_empty() || path.components().count() != 1 || path.file_name().is_none() {
                problems.push(format!("{key}: `{name}` must be a plain file name"));
            }
        }
        if self.styles.sass.is_empty() {
            problems.push("styles.sass: command must not be empty".to_string());
        }
        if self.styles.less.is_empty() {
            problems.push("styles.less: command must not be empty".to_string());
        }
        if !(1..=100).contains(&self.images.jpeg_quality) {
            problems.push(format!(
                "images.jpeg_quality: {} is outside 1-100",
                self.images.jpeg_quality
            ));
        }
        if self.serve.port != 0 && self.serve.port == self.serve.reload_port {
            problems.push("serve.reload_port: must differ from serve.port".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("\n")))
        }
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ConfigFile {
    let (parsed, ignored) = ConfigFile::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_toml() {
        let result = ConfigFile::parse_with_ignored("[paths\nbuild = ");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let (_, ignored) =
            ConfigFile::parse_with_ignored("[serve]\nport = 8080\nopen = true\n[extra]\nx = 1")
                .unwrap();
        assert!(ignored.contains(&"serve.open".to_string()));
        assert!(ignored.contains(&"extra".to_string()));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) =
            ConfigFile::parse_with_ignored("[paths.fonts]\ndest = \"build/f\"").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_defaults_resolve() {
        let config = KilnConfig::with_defaults(Path::new("/site"), BuildMode::Production).unwrap();
        assert_eq!(config.mode, BuildMode::Production);
        assert_eq!(config.paths.build_dir(), Path::new("/site/build"));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_output_name_validated() {
        let file = test_parse_config("[scripts]\noutput = \"js/main.js\"");
        let err = KilnConfig::resolve(file, Path::new("/site"), BuildMode::Development).unwrap_err();
        assert!(err.to_string().contains("scripts.output"));
    }

    #[test]
    fn test_jpeg_quality_validated() {
        let file = test_parse_config("[images]\njpeg_quality = 0");
        assert!(KilnConfig::resolve(file, Path::new("/site"), BuildMode::Development).is_err());
    }

    #[test]
    fn test_from_path_io_error() {
        let err = ConfigFile::from_path(Path::new("/nonexistent/kiln.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_root_relative() {
        let config = KilnConfig::with_defaults(Path::new("/site"), BuildMode::Development).unwrap();
        assert_eq!(
            config.root_relative("/site/build/css/main.min.css"),
            PathBuf::from("build/css/main.min.css")
        );
    }
}
