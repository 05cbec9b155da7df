//! Line-level source maps for concatenated assets.

use std::path::Path;

use oxc_sourcemap::SourceMapBuilder;

use super::Asset;
use crate::utils::path::to_slash_relative;

/// Build a v3 source map for `asset`, one mapping per input line.
///
/// Source paths are written relative to `root`; sources embed their content.
pub fn build(asset: &Asset, root: &Path) -> String {
    let mut builder = SourceMapBuilder::default();
    let file = asset.relative.to_string_lossy();
    builder.set_file(&file);

    for span in &asset.spans {
        let name = to_slash_relative(&span.source, root);
        let source_id = builder.add_source_and_content(&name, &span.content);
        for (line, _) in (0u32..).zip(span.content.lines()) {
            builder.add_token(span.start_line + line, 0, line, 0, Some(source_id), None);
        }
    }

    builder.into_sourcemap().to_json_string()
}

/// Append the mapping comment and return the map asset to write alongside.
pub fn attach(asset: &mut Asset, root: &Path) -> Asset {
    let json = build(asset, root);
    let map_name = format!("{}.map", file_name(&asset.relative));

    let comment = match asset.extension().as_deref() {
        Some("css") => format!("/*# sourceMappingURL={map_name} */"),
        _ => format!("//# sourceMappingURL={map_name}"),
    };
    if !asset.content.is_empty() && !asset.content.ends_with('\n') {
        asset.content.push('\n');
    }
    asset.content.push_str(&comment);
    asset.content.push('\n');

    let relative = asset.relative.with_file_name(&map_name);
    Asset {
        relative,
        content: json,
        spans: Vec::new(),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::asset::concat;
    use std::path::PathBuf;

    fn asset(root: &Path, rel: &str, content: &str) -> Asset {
        Asset::new(&root.join(rel), PathBuf::from(rel), content.to_string())
    }

    #[test]
    fn test_map_lists_sources_with_content() {
        let root = Path::new("/site");
        let joined = concat(
            vec![
                asset(root, "vendor/lib.js", "var lib;"),
                asset(root, "src/js/main.js", "var a;\nvar b;"),
            ],
            "main.min.js",
        );
        let json: serde_json::Value = serde_json::from_str(&build(&joined, root)).unwrap();

        assert_eq!(json["version"], 3);
        assert_eq!(json["file"], "main.min.js");
        assert_eq!(json["sources"][0], "vendor/lib.js");
        assert_eq!(json["sources"][1], "src/js/main.js");
        assert_eq!(json["sourcesContent"][1], "var a;\nvar b;");
        assert!(!json["mappings"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_attach_css_comment() {
        let root = Path::new("/site");
        let mut css = concat(vec![asset(root, "src/a.css", "a{}")], "main.min.css");
        let map = attach(&mut css, root);

        assert_eq!(map.relative, PathBuf::from("main.min.css.map"));
        assert!(css.content.ends_with("/*# sourceMappingURL=main.min.css.map */\n"));
    }

    #[test]
    fn test_attach_js_comment() {
        let root = Path::new("/site");
        let mut js = concat(vec![asset(root, "src/a.js", "var a;\n")], "main.min.js");
        attach(&mut js, root);
        assert_eq!(js.content, "var a;\n//# sourceMappingURL=main.min.js.map\n");
    }
}
