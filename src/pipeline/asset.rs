//! In-memory assets flowing through a pipeline.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pattern::Matched;

/// A text file being transformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Output path relative to the destination directory.
    pub relative: PathBuf,
    pub content: String,
    /// Inputs that make up `content`, in order. One entry until concatenation.
    pub spans: Vec<Span>,
}

/// Lines of an asset contributed by one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Absolute source path.
    pub source: PathBuf,
    /// First output line (0-based) occupied by this input.
    pub start_line: u32,
    /// Text of this input as it was concatenated.
    pub content: String,
}

impl Asset {
    /// Read a matched source file.
    pub fn read(matched: &Matched) -> Result<Self> {
        let content = std::fs::read_to_string(&matched.path)
            .with_context(|| format!("Failed to read {}", matched.path.display()))?;
        Ok(Self::new(&matched.path, matched.relative.clone(), content))
    }

    pub fn new(source: &Path, relative: PathBuf, content: String) -> Self {
        Self {
            relative,
            spans: vec![Span {
                source: source.to_path_buf(),
                start_line: 0,
                content: content.clone(),
            }],
            content,
        }
    }

    /// Source file of a single-input asset (first input after concatenation).
    pub fn source(&self) -> &Path {
        self.spans.first().map_or(Path::new(""), |s| s.source.as_path())
    }

    /// Replace the content of a single-input asset, keeping its span in sync.
    pub fn set_content(&mut self, content: String) {
        if let [span] = self.spans.as_mut_slice() {
            span.content.clone_from(&content);
        }
        self.content = content;
    }

    pub fn extension(&self) -> Option<String> {
        self.relative
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Join assets with a newline into one asset named `name`.
///
/// Each input's starting line is recorded for source maps.
pub fn concat(assets: Vec<Asset>, name: &str) -> Asset {
    let mut content = String::new();
    let mut spans = Vec::with_capacity(assets.len());
    let mut line = 0u32;

    for (i, asset) in assets.into_iter().enumerate() {
        if i > 0 {
            content.push('\n');
            line += 1;
        }
        spans.push(Span {
            source: asset.source().to_path_buf(),
            start_line: line,
            content: asset.content.clone(),
        });
        line += newline_count(&asset.content);
        content.push_str(&asset.content);
    }

    Asset {
        relative: PathBuf::from(name),
        content,
        spans,
    }
}

fn newline_count(s: &str) -> u32 {
    u32::try_from(s.matches('\n').count()).unwrap_or(u32::MAX)
}
