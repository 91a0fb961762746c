// src/core/state/client.rs

//! Contains state definitions related to client connections.

use dashmap::DashMap;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Why the server is closing a client connection on its own initiative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The user the connection was bound to was removed by `ACL DELUSER`.
    UserDeleted(String),
    /// The user the connection was bound to no longer exists after `ACL LOAD`.
    UserRemovedByLoad(String),
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CloseReason::UserDeleted(user) => {
                write!(f, "ERR connection closed: user '{user}' was deleted")
            }
            CloseReason::UserRemovedByLoad(user) => {
                write!(f, "ERR connection closed: user '{user}' was removed by ACL LOAD")
            }
        }
    }
}

pub type KillSender = broadcast::Sender<CloseReason>;

#[derive(Debug)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub session_id: u64,
    pub created: Instant,
}

/// The entry kept for every live connection.
#[derive(Debug)]
pub struct ClientHandle {
    pub info: ClientInfo,
    /// Delivers a `CloseReason` to the connection's handler task.
    pub kill_tx: KillSender,
}

pub type ClientMap = Arc<DashMap<u64, ClientHandle>>;
