//! Live reload script injection for served HTML.

use crate::reload::client;

/// Inject the reload client if content is HTML and a reload port is set
pub fn maybe_inject_reload(body: Vec<u8>, content_type: &str, reload_port: Option<u16>) -> Vec<u8> {
    match (content_type.starts_with("text/html"), reload_port) {
        (true, Some(port)) => inject_reload_script(&body, &client::script(port)),
        _ => body,
    }
}

/// Insert `script` before the last `</body>`, or append when there is none
fn inject_reload_script(content: &[u8], script: &str) -> Vec<u8> {
    const PATTERN: &[u8] = b"</body>";

    let pos = content
        .windows(PATTERN.len())
        .rposition(|w| w.eq_ignore_ascii_case(PATTERN))
        .unwrap_or(content.len());

    let mut result = Vec::with_capacity(content.len() + script.len());
    result.extend_from_slice(&content[..pos]);
    result.extend_from_slice(script.as_bytes());
    result.extend_from_slice(&content[pos..]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mime::types::{CSS, HTML};

    #[test]
    fn test_inject_before_body() {
        let out = inject_reload_script(b"<html><body><p>x</p></BODY></html>", "<script></script>");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "<html><body><p>x</p><script></script></BODY></html>"
        );
    }

    #[test]
    fn test_inject_uses_last_body() {
        let page = b"<body><pre></body></pre></body>";
        let out = inject_reload_script(page, "S");
        assert_eq!(String::from_utf8(out).unwrap(), "<body><pre></body></pre>S</body>");
    }

    #[test]
    fn test_inject_appends_without_body() {
        let out = inject_reload_script(b"<p>fragment</p>", "S");
        assert_eq!(String::from_utf8(out).unwrap(), "<p>fragment</p>S");
    }

    #[test]
    fn test_only_html_with_port() {
        let body = b"<body></body>".to_vec();
        assert_eq!(maybe_inject_reload(body.clone(), CSS, Some(35729)), body);
        assert_eq!(maybe_inject_reload(body.clone(), HTML, None), body);

        let injected = maybe_inject_reload(body, HTML, Some(35729));
        assert!(String::from_utf8(injected).unwrap().contains(":35729"));
    }
}
