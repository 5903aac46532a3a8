// src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

mod completion;
mod config;
mod error;
mod observer;
mod server;

use crate::{
    completion::CompletionSet,
    config::SinkConfig,
    observer::TracingObserver,
    server::SinkServer,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tcp_sink=debug".parse()?),
        )
        .init();

    // Optional config file argument; built-in defaults otherwise.
    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            config::load_config(&path).await?
        }
        None => SinkConfig::default(),
    };

    let (mut completions, notifier) = CompletionSet::new();
    let observer = Arc::new(TracingObserver);

    let (server, shutdown) =
        SinkServer::bind(&config.listen_addr, observer, notifier).await?;
    let server = server.with_read_buffer_size(config.read_buffer_size);

    info!("Sink server listening on {}", server.local_addr());
    tokio::spawn(server.run());

    shutdown_signal().await;
    shutdown.shutdown();

    // One signal per task: the accept loop plus any handlers still
    // draining. Wait for all of them before exiting.
    completions.wait_idle().await;
    info!("All tasks completed, exiting");

    Ok(())
}

// Graceful shutdown handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
