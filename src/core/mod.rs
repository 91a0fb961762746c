// src/core/mod.rs

//! The central module containing the core logic and data structures of KeyGate.

pub mod acl;
pub mod commands;
pub mod database;
pub mod errors;
pub mod handler;
pub mod protocol;
pub mod pubsub;
pub mod state;

pub use commands::Command;
pub use errors::KeyGateError;
pub use protocol::RespValue;
