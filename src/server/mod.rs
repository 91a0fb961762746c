// src/server/mod.rs

use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Result, anyhow};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;

mod connection_loop;
mod context;
mod initialization;

pub use context::ServerContext;

/// The main server startup function: initializes state, binds the listener
/// and serves until SIGINT or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow!("Failed to register SIGINT handler: {}", e))?;
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow!("Failed to register SIGTERM handler: {}", e))?;
    let shutdown = async move {
        tokio::select! {
            _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown."),
            _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown."),
        }
    };

    let server_context = initialization::setup(config).await?;
    connection_loop::run(server_context, shutdown).await;
    Ok(())
}

/// Serves connections from an already bound listener until `shutdown`
/// resolves. Used by embedders and the integration tests.
pub async fn serve<F>(state: Arc<ServerState>, listener: TcpListener, shutdown: F)
where
    F: Future<Output = ()> + Send,
{
    connection_loop::run(ServerContext::new(state, listener), shutdown).await;
}
