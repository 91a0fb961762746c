// src/core/commands/mod.rs

//! This module defines all supported commands and provides the central
//! `Command` enum that encapsulates their parsed state. The
//! `define_commands!` macro generates the enum and its dispatch.

use crate::core::commands::command_trait::{CommandExt, ExecutableCommand, ParseCommand};
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;

pub use command_spec::CommandSpec;
pub use request::CommandRequest;

#[macro_use]
mod command_def;

pub mod command_spec;
pub mod command_trait;
pub mod generic;
pub mod helpers;
pub mod key_extractor;
pub mod request;
pub mod string;

define_commands! {
    // --- Connection and ACL Commands ---
    (Acl, Acl, generic, "acl"),
    (Auth, Auth, generic, "auth"),
    (Ping, Ping, generic, "ping"),
    (Echo, Echo, generic, "echo"),
    (Quit, Quit, generic, "quit"),

    // --- Keyspace Commands ---
    (Del, Del, generic, "del"),
    (Exists, Exists, generic, "exists"),
    (FlushAll, FlushAll, generic, "flushall"),

    // --- Pub/Sub Commands ---
    (Publish, Publish, generic, "publish"),
    (Subscribe, Subscribe, generic, "subscribe"),

    // --- String Commands ---
    (Get, Get, string, "get"),
    (Set, Set, string, "set"),
    (MGet, MGet, string, "mget"),
}

