// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource management.

use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::debug;

/// Makes sure a connection's client entry and ACL record are removed however
/// its handler exits.
pub struct ConnectionGuard {
    pub(crate) state: Arc<ServerState>,
    pub(crate) session_id: u64,
    pub(crate) addr: SocketAddr,
}

impl ConnectionGuard {
    pub(crate) fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        debug!(
            "ConnectionGuard dropping, cleaning up resources for connection {}",
            self.addr
        );

        match self.state.clients.remove(&self.session_id) {
            Some((_, client)) => debug!(
                "Client {} closed after {:?}.",
                self.addr,
                client.info.created.elapsed()
            ),
            None => debug!(
                "Client {} was not in the global state map upon cleanup.",
                self.addr
            ),
        }
        self.state.acl.unregister_connection(self.session_id);
        self.state.pubsub.purge_empty_channels();
    }
}
