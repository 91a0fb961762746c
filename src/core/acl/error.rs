// src/core/acl/error.rs

//! The error taxonomy of the ACL engine. Every variant is recoverable and is
//! reported to the client as a RESP error reply.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AclError {
    #[error("ERR User '{0}' does not exist")]
    UserNotFound(String),

    #[error("ERR User '{0}' is disabled")]
    UserDisabled(String),

    #[error("WRONGPASS invalid username-password pair or user is disabled.")]
    InvalidCredential,

    #[error("ERR Error in ACL rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },

    #[error("ERR Unknown category '{0}'")]
    CategoryNotFound(String),

    #[error("NOPERM User {user} has no permissions to run the '{command}' command")]
    CommandExcluded { user: String, command: String },

    #[error(
        "NOPERM User {user} has no permissions to run the '{command}' command (category '@{category}' is excluded)"
    )]
    CategoryExcluded {
        user: String,
        command: String,
        category: String,
    },

    #[error("NOPERM User {user} has no permissions to run the '{command}' command")]
    CommandNotPermitted { user: String, command: String },

    #[error("NOPERM User {user} has no permissions to access the '{key}' key")]
    KeyNotPermitted { user: String, key: String },

    #[error("NOPERM User {user} has no permissions to access the '{channel}' channel")]
    ChannelNotPermitted { user: String, channel: String },

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(String),

    #[error("ERR The 'default' user cannot be removed")]
    DefaultUserImmutable,

    #[error("ERR connection {0} was closed by an ACL change")]
    ConnectionRevoked(u64),

    #[error("ERR This instance is not configured to use an ACL file. Set 'acl_file' in the config.")]
    AclFileNotConfigured,

    #[error("ERR ACL file is corrupt at line {line}: {reason}")]
    AclFileCorrupt { line: usize, reason: String },

    #[error("ERR ACL file I/O error: {0}")]
    AclFileIo(String),
}

impl AclError {
    /// Shorthand for building an `InvalidRule` error.
    pub fn invalid_rule(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        AclError::InvalidRule {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// True for the failures `AUTH` collapses into a single `WRONGPASS` reply.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AclError::UserNotFound(_) | AclError::UserDisabled(_) | AclError::InvalidCredential
        )
    }
}
