// src/server/handler.rs
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use crate::completion::CompletionGuard;
use crate::observer::ConnObserver;

/// Reads the connection to end-of-stream and discards the bytes.
///
/// `Ok(0)` means the peer closed its sending side; that is the normal exit,
/// not an error. Any other read error is reported to the observer and ends
/// only this handler. The connection is closed exactly once when `stream`
/// drops at the end of this function, and `guard` emits exactly one
/// completion signal on every exit path, cancellation included.
pub(crate) async fn drain(
    mut stream: TcpStream,
    peer: SocketAddr,
    buffer_size: usize,
    observer: Arc<dyn ConnObserver>,
    guard: CompletionGuard,
) {
    let _guard = guard;
    let mut buf = vec![0u8; buffer_size];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) => {
                observer.end_of_stream(peer);
                break;
            }
            Ok(n) => observer.bytes_received(peer, &buf[..n]),
            Err(err) => {
                observer.read_error(peer, &err);
                break;
            }
        }
    }

    if let Err(err) = stream.shutdown().await {
        debug!(%peer, %err, "shutdown after drain failed");
    }
}
