//! Minification for the production pipelines.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Markup only has its
//! whitespace collapsed.

use std::sync::LazyLock;

use anyhow::{Result, anyhow, bail};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use regex::Regex;

/// Minify JavaScript source code.
///
/// Parsed as a classic script, so top-level names stay global.
pub fn minify_js(source: &str, name: &str) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, SourceType::script()).parse();
    if let Some(error) = ret.errors.first() {
        bail!("{name}: {error}");
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str, name: &str) -> Result<String> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("{name}: {e}"))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| anyhow!("{name}: {e}"))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("{name}: {e}"))?;
    Ok(result.code)
}

/// Elements whose contents keep their whitespace.
static PRESERVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<pre\b.*?</pre\s*>|<textarea\b.*?</textarea\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>",
    )
    .expect("valid preserved-element regex")
});
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Elements rendered inline: a space between two of them is visible text.
const INLINE: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "button", "cite", "code", "del", "dfn",
    "em", "font", "i", "img", "input", "ins", "kbd", "label", "mark", "math", "nobr", "object",
    "q", "rp", "rt", "rtc", "ruby", "s", "samp", "select", "small", "span", "strike", "strong",
    "sub", "sup", "svg", "textarea", "time", "tt", "u", "var",
];

/// Collapse whitespace in HTML.
///
/// Runs become a single space. A run between two tags is dropped unless both
/// tags are inline elements. Contents of `pre`, `textarea`, `script` and
/// `style` are left untouched.
pub fn collapse_whitespace(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    let mut prev = None;

    for m in PRESERVED.find_iter(html) {
        let block = m.as_str();
        let name = tag_name(&block[1..]);
        out.push_str(&collapse_segment(&html[last..m.start()], prev, Some(name)));
        out.push_str(block);
        prev = Some(name);
        last = m.end();
    }
    out.push_str(&collapse_segment(&html[last..], prev, None));

    out.trim().to_string()
}

/// Collapse text between preserved blocks. `prev`/`next` name the preserved
/// elements touching the start/end of the segment.
fn collapse_segment(text: &str, prev: Option<&str>, next: Option<&str>) -> String {
    let spaced = WHITESPACE.replace_all(text, " ");
    let mut segment = collapse_between_tags(&spaced);

    if segment.trim().is_empty() {
        let keep = !segment.is_empty()
            && matches!((prev, next), (Some(left), Some(right)) if is_visible(left, right));
        return if keep { " ".to_string() } else { String::new() };
    }
    if let Some(right) = next {
        let body = segment.trim_end();
        let end = body.len();
        if end < segment.len() && body.ends_with('>') && !is_visible(last_tag(body), right) {
            segment.truncate(end);
        }
    }
    if let Some(left) = prev {
        let body = segment.trim_start();
        if body.len() < segment.len() && body.starts_with('<') && !is_visible(left, tag_name(&body[1..])) {
            segment = body.to_string();
        }
    }
    segment
}

/// Resolve every `> <` in already-spaced text.
fn collapse_between_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for (at, _) in text.match_indices("> <") {
        out.push_str(&text[last..=at]);
        if is_visible(last_tag(&text[..=at]), tag_name(&text[at + 3..])) {
            out.push(' ');
        }
        last = at + 2;
    }
    out.push_str(&text[last..]);
    out
}

fn is_visible(left: &str, right: &str) -> bool {
    let inline = |name: &str| INLINE.iter().any(|tag| tag.eq_ignore_ascii_case(name));
    inline(left) && inline(right)
}

/// Name of the tag starting right after its `<`; empty for comments and doctypes.
fn tag_name(tag: &str) -> &str {
    let tag = tag.strip_prefix('/').unwrap_or(tag);
    let end = tag
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(tag.len());
    &tag[..end]
}

/// Name of the tag closing `text`.
fn last_tag(text: &str) -> &str {
    text.rfind('<').map_or("", |start| tag_name(&text[start + 1..]))
}
