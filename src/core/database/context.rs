// src/core/database/context.rs

use super::core::Db;
use crate::core::state::ServerState;
use std::sync::Arc;

/// `ExecutionContext` provides the state a `Command` needs while it executes.
pub struct ExecutionContext<'a> {
    pub state: Arc<ServerState>,
    pub db: &'a Db,
    /// The connection the command arrived on. Also its ACL connection handle.
    pub session_id: u64,
}
