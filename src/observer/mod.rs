// src/observer/mod.rs
use std::net::SocketAddr;

use tracing::{debug, info, warn};

/// Observation hooks for the accept loop and connection handlers.
///
/// Injected into each task instead of a globally reachable logger so
/// handlers can be exercised in isolation with a recording impl.
pub trait ConnObserver: Send + Sync {
    fn connection_accepted(&self, _peer: SocketAddr) {}

    /// Called once per successful read with the bytes received.
    /// Observational only; nothing is ever written back to the peer.
    fn bytes_received(&self, _peer: SocketAddr, _data: &[u8]) {}

    fn end_of_stream(&self, _peer: SocketAddr) {}

    /// A read failure other than end-of-stream. Terminal for the affected
    /// connection only.
    fn read_error(&self, _peer: SocketAddr, _err: &std::io::Error) {}

    /// An accept failure, which terminates the accept loop.
    fn accept_error(&self, _err: &std::io::Error) {}
}

/// Production observer: logs through `tracing`.
pub struct TracingObserver;

impl ConnObserver for TracingObserver {
    fn connection_accepted(&self, peer: SocketAddr) {
        info!(%peer, "accepted connection");
    }

    fn bytes_received(&self, peer: SocketAddr, data: &[u8]) {
        debug!(%peer, bytes = data.len(), "received");
    }

    fn end_of_stream(&self, peer: SocketAddr) {
        debug!(%peer, "peer closed connection");
    }

    fn read_error(&self, peer: SocketAddr, err: &std::io::Error) {
        warn!(%peer, %err, "read failed");
    }

    fn accept_error(&self, err: &std::io::Error) {
        warn!(%err, "accept failed, stopping accept loop");
    }
}
