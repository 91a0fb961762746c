// src/core/handler/command_router.rs

//! The central component for routing requests to their handlers.
//!
//! The `Router` receives a raw request frame from the `ConnectionHandler`,
//! resolves it against the command table, runs the ACL check and only then
//! parses and executes the command.

use super::pipeline::acl_check;
use crate::core::commands::CommandRequest;
use crate::core::commands::command_trait::CommandExt;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::state::ServerState;
use crate::core::{Command, KeyGateError, RespValue};
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{Instrument, debug, info_span};

/// The ways a routed request can be answered.
#[derive(Debug)]
pub enum RouteResponse {
    /// A single RESP value. This is the most common response type.
    Single(RespValue),
    /// Send the value, then close the connection (`QUIT`).
    Close(RespValue),
    /// The connection must subscribe to these channels and confirm each one.
    Subscribe(Vec<Bytes>),
    /// Nothing is sent back, e.g. for an empty inline line.
    NoOp,
}

/// The `Router` directs one connection's requests through the pipeline.
pub struct Router {
    state: Arc<ServerState>,
    session_id: u64,
    addr: SocketAddr,
}

impl Router {
    pub fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }

    /// The main entry point for routing a request frame.
    pub async fn route(&mut self, frame: RespFrame) -> Result<RouteResponse, KeyGateError> {
        if matches!(&frame, RespFrame::Array(parts) if parts.is_empty()) {
            return Ok(RouteResponse::NoOp);
        }

        let request = CommandRequest::from_frame(frame)?;
        let span = info_span!(
            "command",
            name = %request.token,
            client.addr = %self.addr,
            client.id = %self.session_id,
        );

        async move {
            self.state.stats.increment_total_commands();

            // 1. ACL check on the resolved, still unparsed, request.
            acl_check::check_permissions(&self.state, self.session_id, &request)?;

            // 2. Argument parsing.
            let command = request.parse()?;
            debug!("Executing '{}'.", request.token);

            // 3. Dispatch.
            match command {
                Command::Quit(_) => Ok(RouteResponse::Close(RespValue::ok())),
                Command::Subscribe(cmd) => Ok(RouteResponse::Subscribe(cmd.channels)),
                cmd if request.effective.sync => {
                    let _gate = self.state.sync_gate.lock().await;
                    self.execute_command(cmd).await
                }
                cmd => self.execute_command(cmd).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn execute_command(&self, command: Command) -> Result<RouteResponse, KeyGateError> {
        let db = self.state.db.clone();
        let mut ctx = ExecutionContext {
            state: self.state.clone(),
            db: &db,
            session_id: self.session_id,
        };
        command.execute(&mut ctx).await.map(RouteResponse::Single)
    }
}
