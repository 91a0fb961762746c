// src/connection/mod.rs

//! Manages the lifecycle of a single client TCP connection: frame decoding,
//! routing, Pub/Sub pushes and the ACL kill signal.

mod guard;
mod handler;

pub use guard::ConnectionGuard;
pub use handler::ConnectionHandler;
