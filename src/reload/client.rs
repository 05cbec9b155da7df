//! Browser side of live reload.

/// Script appended to served HTML pages. `__KILN_PORT__` is the reload port.
const CLIENT_SCRIPT: &str = r#"<script>
(function () {
  function refreshCss(path) {
    var links = document.querySelectorAll('link[rel="stylesheet"]');
    var found = false;
    links.forEach(function (link) {
      var url = new URL(link.href, location.href);
      if (url.pathname !== path) return;
      url.searchParams.set("kiln", Date.now());
      link.href = url.toString();
      found = true;
    });
    if (!found) location.reload();
  }
  function connect() {
    var ws = new WebSocket("ws://" + location.hostname + ":__KILN_PORT__");
    ws.onmessage = function (event) {
      var msg = JSON.parse(event.data);
      if (msg.type === "reload") location.reload();
      else if (msg.type === "css") refreshCss(msg.path);
    };
    ws.onclose = function () { setTimeout(connect, 1000); };
  }
  connect();
})();
</script>"#;

/// Client script connecting to the reload listener on `port`.
pub fn script(port: u16) -> String {
    CLIENT_SCRIPT.replace("__KILN_PORT__", &port.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_embeds_port() {
        let script = script(35730);
        assert!(script.contains(":35730\""));
        assert!(!script.contains("__KILN_PORT__"));
        assert!(script.starts_with("<script>"));
        assert!(script.ends_with("</script>"));
    }
}
