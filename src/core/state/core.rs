// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use super::client::{ClientMap, CloseReason};
use super::stats::StatsState;
use crate::config::Config;
use crate::core::KeyGateError;
use crate::core::acl::file::parse_acl_file;
use crate::core::acl::{AclEngine, ConnectionId};
use crate::core::database::Db;
use crate::core::pubsub::PubSubManager;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// The central struct holding all shared, server-wide state.
/// Wrapped in an `Arc` and passed to every connection handler.
#[derive(Debug)]
pub struct ServerState {
    pub config: Config,
    /// Users, their rules and the connection bindings.
    pub acl: AclEngine,
    /// A map of all active client connections, keyed by session ID.
    pub clients: ClientMap,
    pub db: Arc<Db>,
    pub pubsub: PubSubManager,
    pub stats: StatsState,
    /// Held while a command whose spec is marked `sync` executes.
    pub sync_gate: Mutex<()>,
}

impl ServerState {
    /// Initializes the server state from the given configuration, loading the
    /// ACL file when one is configured and present.
    pub fn initialize(config: Config) -> Result<Arc<Self>, KeyGateError> {
        let acl = AclEngine::new(&config.acl)?;

        if let Some(path) = &config.acl_file {
            match std::fs::read_to_string(path) {
                Ok(contents) => {
                    let users = parse_acl_file(&contents, acl.rule_options()).map_err(|e| {
                        error!("Failed to parse ACL file '{}': {}", path, e);
                        e
                    })?;
                    let count = users.len();
                    acl.replace_users(users)?;
                    info!("Loaded {} ACL users from '{}'.", count, path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    info!(
                        "ACL file '{}' not found. Starting with the default user only. It will be created on `ACL SAVE`.",
                        path
                    );
                }
                Err(e) => {
                    error!("Failed to read ACL file '{}': {}", path, e);
                    return Err(e.into());
                }
            }
        } else if config.acl.enabled {
            warn!("'acl_file' is not configured. `ACL LOAD` and `ACL SAVE` will fail.");
        }

        Ok(Arc::new(Self {
            config,
            acl,
            clients: Arc::new(DashMap::new()),
            db: Arc::new(Db::new()),
            pubsub: PubSubManager::new(),
            stats: StatsState::new(),
            sync_gate: Mutex::new(()),
        }))
    }

    /// Signals each listed connection to close with the given reason. Must be
    /// called after the ACL lock has been released.
    pub fn kill_clients<F>(&self, victims: &[(ConnectionId, String)], reason: F) -> usize
    where
        F: Fn(String) -> CloseReason,
    {
        let mut killed = 0;
        for (session_id, username) in victims {
            if let Some(client) = self.clients.get(session_id) {
                warn!(
                    "Closing connection {} from {}: user '{}' is gone.",
                    session_id, client.info.addr, username
                );
                if client.kill_tx.send(reason(username.clone())).is_ok() {
                    killed += 1;
                }
            }
        }
        self.stats.add_killed_connections(killed as u64);
        killed
    }
}
