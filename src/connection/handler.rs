// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use crate::core::KeyGateError;
use crate::core::handler::command_router::{RouteResponse, Router};
use crate::core::protocol::{RespFrame, RespFrameCodec, RespValue};
use crate::core::state::{CloseReason, ServerState};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Buffered Pub/Sub messages waiting to be written to this connection.
const PUSH_QUEUE_CAPACITY: usize = 256;

/// A published message routed to this connection: `(channel, payload)`.
type PushMessage = (Bytes, Bytes);

/// The next step for the connection's main loop to take.
enum NextAction {
    Continue,
    ExitLoop,
}

/// Manages the full lifecycle of a client connection.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, RespFrameCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    /// Fires when an ACL change revokes this connection's user.
    kill_rx: broadcast::Receiver<CloseReason>,
    shutdown_rx: broadcast::Receiver<()>,
    push_tx: mpsc::Sender<PushMessage>,
    push_rx: mpsc::Receiver<PushMessage>,
    /// One forwarding task per subscribed channel.
    subscriptions: HashMap<Bytes, JoinHandle<()>>,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        kill_rx: broadcast::Receiver<CloseReason>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        let (push_tx, push_rx) = mpsc::channel(PUSH_QUEUE_CAPACITY);
        Self {
            framed: Framed::new(socket, RespFrameCodec),
            addr,
            state,
            session_id,
            kill_rx,
            shutdown_rx,
            push_tx,
            push_rx,
            subscriptions: HashMap::new(),
        }
    }

    /// The main event loop for the connection, handling incoming frames and signals.
    pub async fn run(&mut self) -> Result<(), KeyGateError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        let mut router = Router::new(self.state.clone(), self.session_id, self.addr);

        let result = loop {
            tokio::select! {
                // Prioritize shutdown and kill signals over other events.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.addr);
                    let shutdown_msg = RespFrame::Error("SHUTDOWN Server is shutting down".to_string());
                    let _ = self.framed.send(shutdown_msg).await;
                    break Ok(());
                }
                reason = self.kill_rx.recv() => {
                    if let Ok(reason) = reason {
                        warn!("Connection {} from {} closed: {}", self.session_id, self.addr, reason);
                        let _ = self.framed.send(RespFrame::Error(reason.to_string())).await;
                    }
                    break Ok(());
                }
                Some((channel, payload)) = self.push_rx.recv() => {
                    let push = RespValue::Array(vec![
                        RespValue::bulk("message"),
                        RespValue::BulkString(channel),
                        RespValue::BulkString(payload),
                    ]);
                    if let Err(e) = self.framed.send(push.into()).await {
                        break Err(e);
                    }
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(frame)) => {
                            debug!("Session {}: Received frame: {:?}", self.session_id, frame);
                            match self.process_frame(&mut router, frame).await {
                                Ok(NextAction::Continue) => {}
                                Ok(NextAction::ExitLoop) => break Ok(()),
                                Err(e) => {
                                    if let Err(send_err) = self.send_error_to_client(e).await {
                                        break Err(send_err);
                                    }
                                }
                            }
                        }
                        Some(Err(e)) => {
                            if is_normal_disconnect(&e) {
                                debug!("Connection from {} closed by peer: {}", self.addr, e);
                                break Ok(());
                            }
                            warn!("Connection error for {}: {}", self.addr, e);
                            let _ = self.send_error_to_client(e.clone()).await;
                            break Err(e);
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            break Ok(());
                        }
                    }
                }
            }
        };

        for (_, task) in self.subscriptions.drain() {
            task.abort();
        }
        result
    }

    /// Routes one request frame and writes its response.
    async fn process_frame(
        &mut self,
        router: &mut Router,
        frame: RespFrame,
    ) -> Result<NextAction, KeyGateError> {
        match router.route(frame).await? {
            RouteResponse::Single(response) => {
                debug!(
                    "Session {}: Sending single response: {:?}",
                    self.session_id, response
                );
                self.framed.send(response.into()).await?;
                Ok(NextAction::Continue)
            }
            RouteResponse::Close(response) => {
                self.framed.send(response.into()).await?;
                Ok(NextAction::ExitLoop)
            }
            RouteResponse::Subscribe(channels) => {
                for channel in channels {
                    self.subscribe(channel.clone());
                    let confirmation = RespValue::Array(vec![
                        RespValue::bulk("subscribe"),
                        RespValue::BulkString(channel),
                        RespValue::Integer(self.subscriptions.len() as i64),
                    ]);
                    self.framed.send(confirmation.into()).await?;
                }
                Ok(NextAction::Continue)
            }
            RouteResponse::NoOp => Ok(NextAction::Continue),
        }
    }

    /// Starts forwarding `channel` into this connection's push queue. A second
    /// subscription to the same channel is a no-op.
    fn subscribe(&mut self, channel: Bytes) {
        if self.subscriptions.contains_key(&channel) {
            return;
        }
        let mut rx = self.state.pubsub.subscribe(&channel);
        let push_tx = self.push_tx.clone();
        let session_id = self.session_id;
        let forwarded = channel.clone();
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(payload) => {
                        if push_tx.send((forwarded.clone(), payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            "Subscriber {} lagged, {} messages dropped.",
                            session_id, skipped
                        );
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        self.subscriptions.insert(channel, task);
    }

    async fn send_error_to_client(&mut self, e: KeyGateError) -> Result<(), KeyGateError> {
        let error_frame = RespFrame::Error(e.to_string());
        debug!(
            "Session {}: Sending error response: {:?}",
            self.session_id, error_frame
        );
        self.framed.send(error_frame).await
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &KeyGateError) -> bool {
    matches!(e, KeyGateError::Io(arc_err) if matches!(
        arc_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
