// src/server/acceptor.rs
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::completion::CompletionNotifier;
use crate::error::SinkError;
use crate::observer::ConnObserver;
use crate::server::handler;
use crate::server::listener::{bind_tcp, parse_listen_addr};

const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Accept loop over a bound TCP listener. Each accepted connection is
/// drained to end-of-stream by its own task; the loop itself emits one
/// completion signal when it exits.
pub struct SinkServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    observer: Arc<dyn ConnObserver>,
    notifier: CompletionNotifier,
    read_buffer_size: usize,
    shutdown_rx: watch::Receiver<bool>,
}

/// Unblocks a pending accept and stops the loop. This is the only
/// cancellation signal the server observes.
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl std::fmt::Debug for SinkServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinkServer")
            .field("local_addr", &self.local_addr)
            .field("read_buffer_size", &self.read_buffer_size)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownHandle").finish_non_exhaustive()
    }
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

impl SinkServer {
    /// Binds `addr` (`host:port`, empty host and zero/empty port allowed)
    /// and returns the server together with its shutdown handle. Bind
    /// failure is the one error that escalates.
    pub async fn bind(
        addr: &str,
        observer: Arc<dyn ConnObserver>,
        notifier: CompletionNotifier,
    ) -> Result<(Self, ShutdownHandle), SinkError> {
        let requested = parse_listen_addr(addr)?;
        let listener = bind_tcp(requested).await?;
        let local_addr = listener.local_addr().map_err(|source| SinkError::Bind {
            addr: requested,
            source,
        })?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server = Self {
            listener,
            local_addr,
            observer,
            notifier,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            shutdown_rx,
        };
        Ok((server, ShutdownHandle { tx: shutdown_tx }))
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// The resolved bound address; with a port-0 bind this carries the
    /// ephemeral port the OS assigned.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Runs the accept loop until an accept failure or shutdown. One
    /// handler task is spawned per accepted connection; the loop never
    /// waits for handlers. Exactly one completion signal is emitted on
    /// exit, on every path, via the guard held across the loop.
    pub async fn run(self) {
        let Self {
            listener,
            local_addr,
            observer,
            notifier,
            read_buffer_size,
            mut shutdown_rx,
        } = self;

        let _loop_guard = notifier.guard();
        info!(%local_addr, "accepting connections");

        loop {
            tokio::select! {
                result = listener.accept() => match result {
                    Ok((stream, peer)) => {
                        observer.connection_accepted(peer);
                        tokio::spawn(handler::drain(
                            stream,
                            peer,
                            read_buffer_size,
                            observer.clone(),
                            notifier.guard(),
                        ));
                    }
                    Err(err) => {
                        observer.accept_error(&err);
                        break;
                    }
                },
                changed = shutdown_rx.changed() => {
                    // A dropped handle counts as shutdown too.
                    if changed.is_err() || *shutdown_rx.borrow() {
                        debug!(%local_addr, "listener shut down");
                        break;
                    }
                }
            }
        }
    }
}
