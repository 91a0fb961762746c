// src/core/handler/pipeline/acl_check.rs

//! Pipeline step for enforcing Access Control List (ACL) rules.

use crate::core::KeyGateError;
use crate::core::acl::Invocation;
use crate::core::commands::CommandRequest;
use crate::core::commands::command_trait::CommandFlags;
use crate::core::state::ServerState;
use std::sync::Arc;
use tracing::debug;

/// Checks the request against the rules of the user bound to `session_id`.
/// Runs before the command's arguments are parsed.
pub fn check_permissions(
    state: &Arc<ServerState>,
    session_id: u64,
    request: &CommandRequest,
) -> Result<(), KeyGateError> {
    if !state.acl.is_enabled() || request.flags().contains(CommandFlags::NO_AUTH) {
        return Ok(());
    }

    let keys = request.keys()?;
    let channels = request.channels()?;
    let invocation = Invocation::new(&request.token, request.categories())
        .with_keys(&keys, request.key_access())
        .with_channels(&channels);

    state
        .acl
        .authorize(session_id, &invocation)
        .map_err(|e| {
            state.stats.increment_rejected_commands();
            debug!("Client {} denied '{}': {}", session_id, request.token, e);
            e.into()
        })
}

