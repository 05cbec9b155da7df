//! `[paths]` section: the path table.
//!
//! Maps each asset category to its source patterns, destination directory
//! and watch patterns. Every field is optional in `kiln.toml`; omitted fields
//! keep the built-in row.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! build = "dist"
//!
//! [paths.scripts]
//! src = ["src/js/vendor/*.js", "src/js/main.js"]
//! dest = "dist/js"
//! watch = ["src/js/**/*.js", "!src/js/**/*.min.js"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::core::Category;
use crate::pattern::Patterns;
use crate::utils::path::{is_contained, to_slash_relative};

/// Default build root.
const DEFAULT_BUILD: &str = "build";

/// Raw `[paths]` section as written in `kiln.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Build root, wiped by `clean-dist`.
    pub build: Option<PathBuf>,
    pub markup: PathOverride,
    pub styles: PathOverride,
    pub scripts: PathOverride,
    pub images: PathOverride,
    pub fonts: PathOverride,
    pub favicon: PathOverride,
}

/// Optional override of one path-table row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOverride {
    pub src: Option<Vec<String>>,
    pub dest: Option<PathBuf>,
    pub watch: Option<Vec<String>>,
}

impl PathsConfig {
    fn row(&self, category: Category) -> &PathOverride {
        match category {
            Category::Markup => &self.markup,
            Category::Styles => &self.styles,
            Category::Scripts => &self.scripts,
            Category::Images => &self.images,
            Category::Fonts => &self.fonts,
            Category::Favicon => &self.favicon,
        }
    }
}

/// Built-in row: (source patterns, destination, watch patterns).
fn default_row(category: Category) -> (&'static [&'static str], &'static str, &'static [&'static str]) {
    match category {
        Category::Markup => (&["src/pages/**/*.html"], "build", &["src/**/*.html"]),
        Category::Styles => (&["src/scss/**/main.scss"], "build/css", &["src/**/*.scss"]),
        Category::Scripts => (
            &["node_modules/jquery/dist/jquery.min.js", "src/**/main.js"],
            "build/js",
            &["src/**/*.js", "!src/**/*.min.js"],
        ),
        Category::Images => (&["src/img/**/*"], "build/img", &["src/img/**/*"]),
        Category::Fonts => (&["src/fonts/**/*"], "build/fonts", &[]),
        Category::Favicon => (&["src/img/favicon/*.*"], "build/img/favicon", &[]),
    }
}

/// One resolved row of the path table.
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub src: Patterns,
    /// Absolute destination directory.
    pub dest: PathBuf,
    pub watch: Patterns,
}

/// Immutable path table, resolved against the project root.
#[derive(Debug, Clone)]
pub struct PathTable {
    root: PathBuf,
    build: PathBuf,
    entries: BTreeMap<Category, PathEntry>,
}

impl PathTable {
    /// Resolve the table from config overrides.
    ///
    /// Collects every invalid row before failing.
    pub fn resolve(config: &PathsConfig, root: &Path) -> Result<Self, ConfigError> {
        let mut problems = Vec::new();

        let build_rel = config
            .build
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD));
        let build = root.join(&build_rel);
        if build_rel.as_os_str().is_empty() || !is_contained(&build_rel) || build == root {
            problems.push(format!(
                "paths.build: `{}` must be a relative directory inside the project",
                build_rel.display()
            ));
        }

        let mut entries = BTreeMap::new();
        for category in Category::ALL {
            match resolve_row(category, config.row(category), root) {
                Ok(entry) => {
                    entries.insert(category, entry);
                }
                Err(problem) => problems.push(problem),
            }
        }

        // Directories emptied by clean-dist and clean-img
        let mut cleaned = vec![("paths.build", build.clone())];
        if let Some(images) = entries.get(&Category::Images) {
            cleaned.push(("paths.images.dest", images.dest.clone()));
        }
        for (key, dir) in cleaned.iter().filter(|(_, dir)| dir.as_path() != root) {
            if let Some(category) = source_inside(&entries, root, dir) {
                problems.push(format!(
                    "{key}: `{}` contains sources of paths.{}.src and would be wiped",
                    to_slash_relative(dir, root),
                    category.name()
                ));
            }
        }

        if !problems.is_empty() {
            return Err(ConfigError::Validation(problems.join("\n")));
        }

        Ok(Self {
            root: root.to_path_buf(),
            build,
            entries,
        })
    }

    /// Built-in table for `root`.
    #[cfg(test)]
    pub fn defaults(root: &Path) -> Result<Self, ConfigError> {
        Self::resolve(&PathsConfig::default(), root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute build root.
    pub fn build_dir(&self) -> &Path {
        &self.build
    }

    pub fn get(&self, category: Category) -> &PathEntry {
        // Every category is inserted by `resolve`
        &self.entries[&category]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &PathEntry)> {
        self.entries.iter().map(|(c, e)| (*c, e))
    }
}

fn resolve_row(category: Category, row: &PathOverride, root: &Path) -> Result<PathEntry, String> {
    let (default_src, default_dest, default_watch) = default_row(category);
    let name = category.name();

    let src: Vec<String> = row
        .src
        .clone()
        .unwrap_or_else(|| default_src.iter().map(|s| s.to_string()).collect());
    let dest = row
        .dest
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_dest));
    let watch: Vec<String> = row
        .watch
        .clone()
        .unwrap_or_else(|| default_watch.iter().map(|s| s.to_string()).collect());

    let src = Patterns::new(&src).map_err(|e| format!("paths.{name}.src: {e:#}"))?;
    if src.is_empty() {
        return Err(format!("paths.{name}.src: at least one source pattern is required"));
    }
    if dest.as_os_str().is_empty() || !is_contained(&dest) || root.join(&dest) == root {
        return Err(format!(
            "paths.{name}.dest: `{}` must be a relative directory inside the project",
            dest.display()
        ));
    }
    let watch = Patterns::new(&watch).map_err(|e| format!("paths.{name}.watch: {e:#}"))?;

    Ok(PathEntry {
        src,
        dest: root.join(dest),
        watch,
    })
}

/// First category whose source glob base lies inside `dir`.
fn source_inside(entries: &BTreeMap<Category, PathEntry>, root: &Path, dir: &Path) -> Option<Category> {
    entries
        .iter()
        .find(|(_, entry)| entry.src.bases().any(|base| root.join(base).starts_with(dir)))
        .map(|(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_default_table() {
        let table = PathTable::defaults(Path::new("/site")).unwrap();

        assert_eq!(table.build_dir(), Path::new("/site/build"));
        assert_eq!(table.get(Category::Markup).dest, PathBuf::from("/site/build"));
        assert_eq!(table.get(Category::Styles).dest, PathBuf::from("/site/build/css"));
        assert_eq!(
            table.get(Category::Favicon).dest,
            PathBuf::from("/site/build/img/favicon")
        );
        assert!(table.get(Category::Fonts).watch.is_empty());
        assert!(table.get(Category::Scripts).watch.matches("src/js/main.js"));
        assert!(!table.get(Category::Scripts).watch.matches("src/js/lib.min.js"));
    }

    #[test]
    fn test_override_keeps_other_fields() {
        let config = test_parse_config("[paths.styles]\ndest = \"public/css\"");
        let table = PathTable::resolve(&config.paths, Path::new("/site")).unwrap();
        let styles = table.get(Category::Styles);

        assert_eq!(styles.dest, PathBuf::from("/site/public/css"));
        assert!(styles.src.matches("src/scss/main.scss"));
    }

    #[test]
    fn test_empty_src_rejected() {
        let config = test_parse_config("[paths.markup]\nsrc = []");
        let err = PathTable::resolve(&config.paths, Path::new("/site")).unwrap_err();
        assert!(err.to_string().contains("paths.markup.src"));
    }

    #[test]
    fn test_escaping_dest_rejected() {
        let config = test_parse_config("[paths]\nbuild = \"../out\"\n[paths.fonts]\ndest = \"/tmp/fonts\"");
        let err = PathTable::resolve(&config.paths, Path::new("/site")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("paths.build"));
        assert!(message.contains("paths.fonts.dest"));
    }

    #[test]
    fn test_project_root_rejected_as_output() {
        let config = test_parse_config("[paths]\nbuild = \".\"\n[paths.images]\ndest = \"./\"");
        let err = PathTable::resolve(&config.paths, Path::new("/site")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("paths.build"));
        assert!(message.contains("paths.images.dest"));
    }

    #[test]
    fn test_cleaned_dir_containing_sources_rejected() {
        let config = test_parse_config("[paths]\nbuild = \"src\"");
        let err = PathTable::resolve(&config.paths, Path::new("/site")).unwrap_err();
        assert!(err.to_string().contains("paths.build: `src` contains sources"));

        let config = test_parse_config("[paths.images]\ndest = \"src/img\"");
        let err = PathTable::resolve(&config.paths, Path::new("/site")).unwrap_err();
        assert!(err.to_string().contains("paths.images.dest"));
    }

    #[test]
    fn test_sibling_build_dir_accepted() {
        let config = test_parse_config("[paths]\nbuild = \"./dist\"");
        let table = PathTable::resolve(&config.paths, Path::new("/site")).unwrap();
        assert_eq!(table.build_dir(), Path::new("/site/dist"));
    }
}
