// src/server/initialization.rs

//! Handles server initialization: state setup, the startup ACL load and the
//! listener.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::state::ServerState;
use anyhow::{Result, anyhow};
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Initializes all server components before starting the main loop.
pub async fn setup(config: Config) -> Result<ServerContext> {
    log_startup_info(&config);

    let server_state = ServerState::initialize(config)
        .map_err(|e| anyhow!("Failed to initialize server state: {}", e))?;
    info!("Server state initialized.");

    let (host, port) = (server_state.config.host.clone(), server_state.config.port);
    let listener = TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|e| anyhow!("Failed to bind {}:{}: {}", host, port, e))?;
    info!("KeyGate server listening on {}:{}", host, port);

    Ok(ServerContext::new(server_state, listener))
}

fn log_startup_info(config: &Config) {
    info!("Starting KeyGate v{}", env!("CARGO_PKG_VERSION"));
    info!("Max clients: {}", config.max_clients);
    if config.acl.enabled {
        info!(
            "ACL enabled (strict rules: {}, password hash: {:?}).",
            config.acl.strict_rules, config.acl.password_hash
        );
    } else {
        warn!("ACL is disabled. Every connection may run every command.");
    }
}
