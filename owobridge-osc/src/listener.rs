//! owobridge-osc/src/listener.rs
//!
//! The UDP receive loop. VRChat sends avatar parameter changes to port 9001 by
//! default, so that is where the bridge listens unless configured otherwise.

use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::{OscDispatcher, OscError, Result};

const RECV_BUFFER_SIZE: usize = 1536;

pub struct OscListener {
    socket: UdpSocket,
    dispatcher: OscDispatcher,
}

impl OscListener {
    /// Bind the socket right away so port conflicts surface at start-up.
    pub async fn bind(addr: SocketAddr, dispatcher: OscDispatcher) -> Result<Self> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|e| OscError::IoError(format!("Failed to bind OSC port {addr}: {e}")))?;
        Ok(Self { socket, dispatcher })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| OscError::IoError(e.to_string()))
    }

    /// Receive until `shutdown_rx` flips to true.
    pub async fn run(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        info!("OSC listener on UDP {}", self.local_addr()?);

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            tokio::select! {
                res = self.socket.recv_from(&mut buf) => {
                    match res {
                        Ok((size, from)) => {
                            if let Err(e) = self.dispatcher.dispatch_packet(&buf[..size]) {
                                debug!("Dropping datagram from {from}: {e}");
                            }
                        }
                        Err(e) => {
                            error!("Error receiving OSC => {:?}", e);
                        }
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        warn!("OSC listener shutting down.");
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
