// src/error.rs
use std::net::SocketAddr;

/// Errors surfaced by the listener setup path. Everything past a successful
/// bind is handled locally by the task that hits it and never escalates.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("invalid listen address {0:?}, expected host:port")]
    InvalidListenAddr(String),

    #[error("failed to bind {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
