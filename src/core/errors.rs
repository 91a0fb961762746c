// src/core/errors.rs

//! Defines the primary error type for the entire application.

use crate::core::acl::AclError;
use std::sync::Arc;
use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// ACL failures are carried transparently so their wire prefixes (`NOPERM`,
/// `WRONGPASS`, ...) reach the client unchanged.
#[derive(Error, Debug, Clone)]
pub enum KeyGateError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Incomplete data in stream")]
    IncompleteData,

    #[error("ERR unknown command '{0}'")]
    UnknownCommand(String),

    #[error("ERR unknown subcommand '{subcommand}' for '{command}'")]
    UnknownSubcommand { command: String, subcommand: String },

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArgumentCount(String),

    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType,

    #[error("ERR invalid request: {0}")]
    InvalidRequest(String),

    #[error("ERR max number of clients reached")]
    MaxClientsReached,

    #[error("ERR internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Acl(#[from] AclError),
}

impl PartialEq for KeyGateError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (KeyGateError::Io(e1), KeyGateError::Io(e2)) => e1.to_string() == e2.to_string(),
            (KeyGateError::UnknownCommand(s1), KeyGateError::UnknownCommand(s2)) => s1 == s2,
            (
                KeyGateError::UnknownSubcommand {
                    command: c1,
                    subcommand: s1,
                },
                KeyGateError::UnknownSubcommand {
                    command: c2,
                    subcommand: s2,
                },
            ) => c1 == c2 && s1 == s2,
            (KeyGateError::WrongArgumentCount(s1), KeyGateError::WrongArgumentCount(s2)) => {
                s1 == s2
            }
            (KeyGateError::InvalidRequest(s1), KeyGateError::InvalidRequest(s2)) => s1 == s2,
            (KeyGateError::Internal(s1), KeyGateError::Internal(s2)) => s1 == s2,
            (KeyGateError::Acl(a1), KeyGateError::Acl(a2)) => a1 == a2,
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for KeyGateError {
    fn from(e: std::io::Error) -> Self {
        KeyGateError::Io(Arc::new(e))
    }
}

impl From<std::str::Utf8Error> for KeyGateError {
    fn from(_: std::str::Utf8Error) -> Self {
        KeyGateError::WrongType
    }
}

impl From<std::string::FromUtf8Error> for KeyGateError {
    fn from(_: std::string::FromUtf8Error) -> Self {
        KeyGateError::WrongType
    }
}
