//! Glob pattern lists with gulp semantics.
//!
//! A pattern list is an ordered set of globs relative to the project root.
//! Entries starting with `!` exclude paths matched by the others:
//!
//! ```text
//! ["src/**/*.js", "!src/**/*.min.js"]
//! ```
//!
//! Each include pattern has a *glob base*, the literal directory prefix before
//! the first wildcard component. Outputs keep their path relative to it:
//! `src/pages/**/*.html` has base `src/pages`, so `src/pages/about/index.html`
//! is written as `about/index.html`.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use globset::{GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashSet;

use crate::utils::path::to_slash_relative;

/// A file matched by a pattern list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched {
    /// Absolute path of the source file.
    pub path: PathBuf,
    /// Path relative to the glob base of the pattern that matched it.
    pub relative: PathBuf,
}

/// One compiled include pattern.
#[derive(Clone)]
struct Include {
    raw: String,
    base: PathBuf,
    /// No wildcards: `base` is the file itself.
    literal: bool,
    matcher: GlobMatcher,
}

/// Compiled include/exclude glob patterns.
#[derive(Clone)]
pub struct Patterns {
    includes: Vec<Include>,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for Patterns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.includes.iter().map(|i| &i.raw))
            .finish()
    }
}

impl Patterns {
    /// Compile a pattern list. `!`-prefixed entries become exclusions.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut includes = Vec::new();
        let mut excludes = GlobSetBuilder::new();
        let mut has_exclude = false;

        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            if let Some(negated) = raw.strip_prefix('!') {
                excludes.add(compile(negated)?.glob().clone());
                has_exclude = true;
                continue;
            }
            let pattern = strip_dot(raw);
            includes.push(Include {
                raw: raw.to_string(),
                base: glob_base(pattern),
                literal: !pattern.contains(['*', '?', '[', '{']),
                matcher: compile(pattern)?,
            });
        }

        let exclude = if has_exclude {
            Some(excludes.build().context("building exclude globset")?)
        } else {
            None
        };

        Ok(Self { includes, exclude })
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
    }

    /// Glob bases of the include patterns, relative to the root.
    pub fn bases(&self) -> impl Iterator<Item = &Path> {
        self.includes.iter().map(|i| i.base.as_path())
    }

    /// Directories to watch for this list, relative to the root.
    ///
    /// Literal file patterns contribute their parent directory.
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for include in &self.includes {
            let dir = if include.literal {
                include.base.parent().map(Path::to_path_buf).unwrap_or_default()
            } else {
                include.base.clone()
            };
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Check a root-relative, slash-separated path against the list.
    pub fn matches(&self, rel_path: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|ex| ex.is_match(rel_path)) {
            return false;
        }
        self.includes.iter().any(|i| i.matcher.is_match(rel_path))
    }

    /// Check an absolute path under `root`.
    pub fn matches_path(&self, path: &Path, root: &Path) -> bool {
        path.starts_with(root) && self.matches(&to_slash_relative(path, root))
    }

    /// Expand the list against the filesystem.
    ///
    /// Order follows the pattern order, then sorted path order within a
    /// pattern. A file matched by several patterns is returned once.
    /// Patterns whose base does not exist contribute nothing; an unreadable
    /// directory under an existing base is an error.
    pub fn expand(&self, root: &Path) -> Result<Vec<Matched>> {
        let mut seen = FxHashSet::default();
        let mut matched = Vec::new();

        for include in &self.includes {
            let base = root.join(&include.base);
            if include.literal {
                if !base.is_file() {
                    continue;
                }
                let rel = to_slash_relative(&base, root);
                if include.matcher.is_match(&rel) && self.not_excluded(&rel) && seen.insert(base.clone()) {
                    let relative = base.file_name().map(PathBuf::from).unwrap_or_default();
                    matched.push(Matched { path: base, relative });
                }
                continue;
            }
            if !base.is_dir() {
                continue;
            }

            // Jobs already run on the rayon pool; walking on it too can time out
            let walk = jwalk::WalkDir::new(&base)
                .sort(true)
                .parallelism(jwalk::Parallelism::Serial);
            for entry in walk {
                let entry = entry.with_context(|| format!("Failed to walk {}", base.display()))?;
                if let Some(error) = &entry.read_children_error {
                    bail!("Failed to read {}: {error}", entry.path().display());
                }
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let rel = to_slash_relative(&path, root);
                if !include.matcher.is_match(&rel) || !self.not_excluded(&rel) {
                    continue;
                }
                if !seen.insert(path.clone()) {
                    continue;
                }
                let relative = path.strip_prefix(&base).map(Path::to_path_buf).unwrap_or_default();
                matched.push(Matched { path, relative });
            }
        }

        Ok(matched)
    }

    fn not_excluded(&self, rel: &str) -> bool {
        !self.exclude.as_ref().is_some_and(|ex| ex.is_match(rel))
    }
}

/// Compile one glob; `*` never crosses a `/`.
fn compile(pattern: &str) -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(strip_dot(pattern))
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

fn strip_dot(pattern: &str) -> &str {
    pattern.strip_prefix("./").unwrap_or(pattern)
}

/// Literal directory prefix of a glob.
///
/// A pattern without wildcards names a single file and is returned whole;
/// `expand` treats that file's parent as the base.
pub fn glob_base(pattern: &str) -> PathBuf {
    let components: Vec<&str> = strip_dot(pattern).split('/').collect();
    let literal = components
        .iter()
        .take_while(|c| !c.contains(['*', '?', '[', '{']))
        .count();

    components[..literal].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_glob_base() {
        assert_eq!(glob_base("src/pages/**/*.html"), PathBuf::from("src/pages"));
        assert_eq!(glob_base("src/img/favicon/*.*"), PathBuf::from("src/img/favicon"));
        assert_eq!(glob_base("./src/**/main.js"), PathBuf::from("src"));
        assert_eq!(glob_base("**/*.js"), PathBuf::new());
        assert_eq!(glob_base("vendor/jquery.min.js"), PathBuf::from("vendor/jquery.min.js"));
    }

    #[test]
    fn test_watch_dirs() {
        let patterns = Patterns::new(&["src/**/*.js", "!src/**/*.min.js", "vendor/a.js"]).unwrap();
        assert_eq!(
            patterns.watch_dirs(),
            vec![PathBuf::from("src"), PathBuf::from("vendor")]
        );
    }

    #[test]
    fn test_bases() {
        let patterns = Patterns::new(&["src/pages/**/*.html", "!src/pages/draft/*", "vendor/a.js"]).unwrap();
        let bases: Vec<_> = patterns.bases().collect();
        assert_eq!(bases, vec![Path::new("src/pages"), Path::new("vendor/a.js")]);
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let patterns = Patterns::new(&["src/*.js"]).unwrap();
        assert!(patterns.matches("src/main.js"));
        assert!(!patterns.matches("src/lib/main.js"));
    }

    #[test]
    fn test_double_star_matches_zero_dirs() {
        let patterns = Patterns::new(&["src/scss/**/main.scss"]).unwrap();
        assert!(patterns.matches("src/scss/main.scss"));
        assert!(patterns.matches("src/scss/theme/main.scss"));
        assert!(!patterns.matches("src/scss/_vars.scss"));
    }

    #[test]
    fn test_negation_excludes() {
        let patterns = Patterns::new(&["src/**/*.js", "!src/**/*.min.js"]).unwrap();
        assert!(patterns.matches("src/js/main.js"));
        assert!(!patterns.matches("src/js/vendor.min.js"));
    }

    #[test]
    fn test_empty_matches_nothing() {
        let empty: [&str; 0] = [];
        let patterns = Patterns::new(&empty).unwrap();
        assert!(patterns.is_empty());
        assert!(!patterns.matches("src/index.html"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Patterns::new(&["src/[*.js"]).is_err());
    }

    #[test]
    fn test_expand_keeps_path_relative_to_base() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/pages/index.html");
        touch(dir.path(), "src/pages/about/index.html");
        touch(dir.path(), "src/partials/header.html");

        let patterns = Patterns::new(&["src/pages/**/*.html"]).unwrap();
        let matched = patterns.expand(dir.path()).unwrap();
        let relative: Vec<_> = matched.iter().map(|m| m.relative.clone()).collect();

        assert_eq!(
            relative,
            vec![PathBuf::from("about/index.html"), PathBuf::from("index.html")]
        );
    }

    #[test]
    fn test_expand_follows_pattern_order_and_dedups() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "vendor/jquery.min.js");
        touch(dir.path(), "src/a/main.js");
        touch(dir.path(), "src/b/main.js");

        let patterns =
            Patterns::new(&["vendor/jquery.min.js", "src/**/main.js", "src/a/main.js"]).unwrap();
        let matched = patterns.expand(dir.path()).unwrap();
        let names: Vec<_> = matched
            .iter()
            .map(|m| to_slash_relative(&m.path, dir.path()))
            .collect();

        assert_eq!(names, vec!["vendor/jquery.min.js", "src/a/main.js", "src/b/main.js"]);
        assert_eq!(matched[0].relative, PathBuf::from("jquery.min.js"));
    }

    #[test]
    fn test_expand_missing_base_is_empty() {
        let dir = TempDir::new().unwrap();
        let patterns = Patterns::new(&["node_modules/jquery/dist/jquery.min.js", "src/**/*.js"]).unwrap();
        assert!(patterns.expand(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_expand_inside_busy_pool() {
        let dir = TempDir::new().unwrap();
        for i in 0..8 {
            touch(dir.path(), &format!("src/pages/{i}/index.html"));
        }
        let patterns = Patterns::new(&["src/pages/**/*.html"]).unwrap();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let counts = parking_lot::Mutex::new(Vec::new());

        pool.install(|| {
            rayon::scope(|s| {
                for _ in 0..8 {
                    s.spawn(|_| {
                        // Hold the pool's workers while the others walk
                        std::thread::sleep(std::time::Duration::from_millis(50));
                        let found = patterns.expand(dir.path()).unwrap().len();
                        counts.lock().push(found);
                    });
                }
            });
        });

        assert_eq!(counts.into_inner(), vec![8; 8]);
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_unreadable_dir_is_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/pages/locked/index.html");
        let locked = dir.path().join("src/pages/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Root ignores permission bits
        let readable = fs::read_dir(&locked).is_ok();

        let patterns = Patterns::new(&["src/pages/**/*.html"]).unwrap();
        let result = patterns.expand(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            assert!(result.is_err());
        }
    }

    #[test]
    fn test_matches_path_outside_root() {
        let patterns = Patterns::new(&["src/**/*.html"]).unwrap();
        let root = Path::new("/site");
        assert!(patterns.matches_path(Path::new("/site/src/index.html"), root));
        assert!(!patterns.matches_path(Path::new("/other/src/index.html"), root));
    }
}
