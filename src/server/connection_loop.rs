// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use crate::core::KeyGateError;
use crate::core::protocol::{RespFrame, RespFrameCodec};
use crate::core::state::{ClientHandle, ClientInfo};
use futures::SinkExt;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio_util::codec::Framed;
use tracing::{error, info, warn};

/// How long connections get to flush their goodbye before being aborted.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// The main server loop that accepts connections until `shutdown` resolves.
pub async fn run<F>(ctx: ServerContext, shutdown: F)
where
    F: Future<Output = ()> + Send,
{
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => break,

            res = ctx.listener.accept() => {
                let (socket, addr) = match res {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        continue;
                    }
                };

                if ctx.state.clients.len() >= ctx.state.config.max_clients {
                    warn!("Rejecting connection from {}: max clients reached.", addr);
                    reject(socket).await;
                    continue;
                }

                info!("Accepted new connection from: {}", addr);
                ctx.state.stats.increment_total_connections();

                session_id_counter = session_id_counter.wrapping_add(1);
                let session_id = session_id_counter;
                let state_clone = ctx.state.clone();

                let (kill_tx, kill_rx) = broadcast::channel(1);
                let shutdown_rx = ctx.shutdown_tx.subscribe();
                state_clone.clients.insert(session_id, ClientHandle {
                    info: ClientInfo { addr, session_id, created: Instant::now() },
                    kill_tx,
                });
                state_clone.acl.register_connection(session_id);

                client_tasks.spawn(async move {
                    let mut handler = ConnectionHandler::new(
                        socket, addr, state_clone, session_id, kill_rx, shutdown_rx,
                    );
                    if let Err(e) = handler.run().await {
                        warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                    }
                });
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res
                    && e.is_panic()
                {
                    error!("A client handler panicked: {e:?}");
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all connections.");
    // No receivers just means no connections are open.
    let _ = ctx.shutdown_tx.send(());

    if tokio::time::timeout(SHUTDOWN_GRACE, async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for connections to close; aborting the rest.");
        client_tasks.shutdown().await;
    }
    info!("Server shutdown complete.");
}

async fn reject(socket: TcpStream) {
    let mut framed = Framed::new(socket, RespFrameCodec);
    let _ = framed
        .send(RespFrame::Error(KeyGateError::MaxClientsReached.to_string()))
        .await;
}
