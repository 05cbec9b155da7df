//! Static file server for the build root, with optional live reload.

mod content;
mod lifecycle;
mod path;
mod response;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam::channel;
use tiny_http::{Request, Server};

use crate::config::KilnConfig;
use crate::core::register_server;
use crate::reload::server::ReloadListener;
use crate::{debug, log};

/// Worker threads answering requests.
const REQUEST_THREADS: usize = 4;

/// Bound server ready to accept requests
pub struct BoundServer {
    server: Arc<Server>,
    config: Arc<KilnConfig>,
    /// Present when watching: the reload channel browsers connect to
    reload: Option<ReloadListener>,
    watch: bool,
    shutdown_rx: channel::Receiver<()>,
}

/// Bind the HTTP server (and, when watching, the reload listener)
/// without entering the request loop.
pub fn bind_server(config: Arc<KilnConfig>, watch: bool) -> Result<BoundServer> {
    let serve = &config.serve;
    let (server, addr) = lifecycle::bind_with_retry(serve.interface, serve.port)?;
    let server = Arc::new(server);

    let reload = if watch {
        let listener = ReloadListener::bind(serve.interface, serve.reload_port)?;
        debug!("reload"; "ws://{}:{}", serve.interface, listener.port());
        Some(listener)
    } else {
        None
    };

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server), shutdown_tx);

    log!("serve"; "http://{}", addr);

    Ok(BoundServer {
        server,
        config,
        reload,
        watch,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Start the actors (when watching) and the request loop; blocks until shutdown.
    pub fn run(self) -> Result<()> {
        let reload_port = self.reload.as_ref().map(ReloadListener::port);
        let actors = self.watch.then(|| {
            lifecycle::spawn_actors(Arc::clone(&self.config), self.reload, self.shutdown_rx)
        });

        let result = run_request_loop(&self.server, &self.config, reload_port);
        lifecycle::wait_for_shutdown(actors);
        result
    }
}

fn run_request_loop(server: &Server, config: &Arc<KilnConfig>, reload_port: Option<u16>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        pool.spawn(move || {
            let root = config.paths.build_dir();
            if let Err(e) = handle_request(request, root, &config.serve.index, reload_port) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, root: &Path, index: &str, reload_port: Option<u16>) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());
    match path::resolve_path(request.url(), root, index) {
        Some(path) => response::respond_file(request, &path, reload_port),
        None => response::respond_not_found(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BuildMode;
    use crate::jobs::testing::{config, touch};
    use std::io::{Read, Write};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
    use tempfile::TempDir;

    fn get(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(stream, "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_serves_build_root() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "build/index.html", "<html><body>hi</body></html>");
        touch(dir.path(), "build/css/main.min.css", "a{color:red}");
        let config = Arc::new(config(dir.path(), BuildMode::Development));

        let (server, addr) = lifecycle::bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap();
        let server = Arc::new(server);
        let handle = {
            let server = Arc::clone(&server);
            std::thread::spawn(move || run_request_loop(&server, &config, Some(35729)))
        };

        let page = get(addr, "/");
        assert!(page.starts_with("HTTP/1.1 200"));
        assert!(page.contains("hi"));
        assert!(page.contains("ws://"));

        let css = get(addr, "/css/main.min.css");
        assert!(css.contains("text/css"));
        assert!(!css.contains("<script>"));

        assert!(get(addr, "/missing.js").starts_with("HTTP/1.1 404"));

        server.unblock();
        handle.join().unwrap().unwrap();
    }
}
