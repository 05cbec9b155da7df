//! WebSocket listener for live reload.
//!
//! The listener is bound before the HTTP server starts so the injected
//! client script knows the final port. Accepted sockets are handed to the
//! WsActor, which performs the handshake.

use std::net::{IpAddr, SocketAddr, TcpListener};
use std::time::Duration;

use anyhow::{Result, anyhow};
use tokio::sync::mpsc;

use crate::actor::messages::WsMsg;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// A bound, not yet accepting, reload listener.
pub struct ReloadListener {
    listener: TcpListener,
    port: u16,
}

impl ReloadListener {
    /// Bind `interface:base_port`, trying the next ports when busy.
    pub fn bind(interface: IpAddr, base_port: u16) -> Result<Self> {
        let (listener, port) = try_bind_port(interface, base_port, MAX_PORT_RETRIES)?;
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Start the acceptor thread, forwarding each client to the WsActor.
    pub fn spawn_acceptor(self, ws_tx: mpsc::Sender<WsMsg>) -> Result<()> {
        let listener = self.listener;
        listener.set_nonblocking(true)?;

        std::thread::spawn(move || {
            loop {
                match listener.accept() {
                    Ok((stream, addr)) => {
                        crate::debug!("reload"; "client connected: {}", addr);
                        // Handshake runs blocking in the WsActor
                        let _ = stream.set_nonblocking(false);
                        if ws_tx.blocking_send(WsMsg::AddClient(stream)).is_err() {
                            break;
                        }
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        std::thread::sleep(Duration::from_millis(100));
                    }
                    Err(e) => {
                        crate::log!("reload"; "accept error: {}", e);
                        std::thread::sleep(Duration::from_millis(100));
                    }
                }
            }
        });

        Ok(())
    }
}

fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind reload server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}
