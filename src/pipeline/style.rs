//! Stylesheet steps: preprocessing and vendor prefixing.

use anyhow::{Context, Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use super::Asset;
use crate::utils::exec::Cmd;

/// External compilers for preprocessed stylesheets.
#[derive(Debug, Clone)]
pub struct Compilers {
    pub sass: Vec<String>,
    pub less: Vec<String>,
}

impl Compilers {
    /// Command for a source extension; `None` means plain CSS.
    fn for_extension(&self, ext: &str) -> Option<&[String]> {
        match ext {
            "scss" | "sass" => Some(&self.sass),
            "less" => Some(&self.less),
            _ => None,
        }
    }
}

/// Compile a `.scss`/`.sass`/`.less` asset to CSS; plain CSS passes through.
pub fn preprocess(asset: &mut Asset, compilers: &Compilers) -> Result<()> {
    let Some(ext) = asset.extension() else {
        return Ok(());
    };
    let Some(command) = compilers.for_extension(&ext) else {
        return Ok(());
    };

    let source = asset.source().to_path_buf();
    let mut cmd = Cmd::from_slice(command).arg(&source);
    if let Some(dir) = source.parent() {
        cmd = cmd.cwd(dir);
    }
    let css = cmd
        .run_stdout()
        .with_context(|| format!("Failed to compile {}", source.display()))?;

    asset.set_content(css);
    asset.relative.set_extension("css");
    Ok(())
}

/// Resolve browserslist queries into lightningcss targets.
pub fn resolve_targets(queries: &[String]) -> Result<Targets> {
    let browsers = Browsers::from_browserslist(queries)
        .map_err(|e| anyhow!("invalid browser targets {queries:?}: {e}"))?;
    Ok(Targets {
        browsers,
        ..Targets::default()
    })
}

/// Add vendor prefixes required by `targets`, keeping the output readable.
pub fn autoprefix(source: &str, name: &str, targets: Targets) -> Result<String> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("{name}: {e}"))?;
    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("{name}: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{name}: {e}"))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn compilers() -> Compilers {
        Compilers {
            sass: vec!["kiln-missing-sass".into()],
            less: vec!["kiln-missing-lessc".into()],
        }
    }

    #[test]
    fn test_plain_css_passes_through() {
        let mut asset = Asset::new(Path::new("/x/a.css"), PathBuf::from("a.css"), "a{}".into());
        preprocess(&mut asset, &compilers()).unwrap();
        assert_eq!(asset.content, "a{}");
        assert_eq!(asset.relative, PathBuf::from("a.css"));
    }

    #[test]
    fn test_missing_compiler_named_in_error() {
        let mut asset = Asset::new(
            Path::new("/x/main.scss"),
            PathBuf::from("main.scss"),
            "$c: red;".into(),
        );
        let err = preprocess(&mut asset, &compilers()).unwrap_err();
        assert!(format!("{err:#}").contains("kiln-missing-sass"));
    }

    #[test]
    fn test_autoprefix_adds_prefixes() {
        let targets = resolve_targets(&["last 10 versions".to_string()]).unwrap();
        let out = autoprefix(".a { user-select: none; }", "main.css", targets).unwrap();
        assert!(out.contains("-webkit-user-select"));
        assert!(out.contains('\n'));
    }

    #[test]
    fn test_invalid_targets() {
        assert!(resolve_targets(&["not a browser query at all".to_string()]).is_err());
    }
}
