//! File inclusion directives.
//!
//! A line whose trimmed content is one of
//!
//! ```text
//! //= partials/header.js
//! <!--= partials/header.html -->
//! /*= partials/reset.css */
//! ```
//!
//! is replaced by the named file, resolved relative to the file containing
//! the directive. Included files are expanded recursively.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?://=\s*(?P<line>\S.*?)|<!--=\s*(?P<html>\S.*?)\s*-->|/\*=\s*(?P<block>\S.*?)\s*\*/)$")
        .expect("valid include regex")
});

/// Expand include directives in `content`, which was read from `source`.
pub fn expand_includes(content: &str, source: &Path) -> Result<String> {
    let mut stack = vec![source.to_path_buf()];
    expand(content, source, &mut stack)
}

fn expand(content: &str, source: &Path, stack: &mut Vec<PathBuf>) -> Result<String> {
    let base = source.parent().unwrap_or(Path::new(""));
    let mut out = String::with_capacity(content.len());

    for line in content.split_inclusive('\n') {
        let Some(target) = directive_target(line) else {
            out.push_str(line);
            continue;
        };

        let path = base.join(target);
        let key = path.canonicalize().unwrap_or_else(|_| path.clone());
        if stack.contains(&key) {
            bail!(
                "include cycle: {} includes {}",
                source.display(),
                path.display()
            );
        }

        let included = fs::read_to_string(&path).with_context(|| {
            format!("{}: cannot include `{}`", source.display(), target)
        })?;

        stack.push(key);
        let expanded = expand(&included, &path, stack)?;
        stack.pop();

        out.push_str(&expanded);
        if line.ends_with('\n') && !expanded.ends_with('\n') {
            out.push('\n');
        }
    }

    Ok(out)
}

fn directive_target(line: &str) -> Option<&str> {
    let caps = DIRECTIVE.captures(line.trim())?;
    caps.name("line")
        .or_else(|| caps.name("html"))
        .or_else(|| caps.name("block"))
        .map(|m| m.as_str())
}
