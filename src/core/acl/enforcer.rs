// src/core/acl/enforcer.rs

//! The permission evaluator. Decides, for one user and one concrete command
//! invocation, whether the command may run.

use super::error::AclError;
use super::user::{ALL, AclUser};
use bytes::Bytes;
use indexmap::IndexSet;

/// The access a command needs on its key arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAccess {
    Read,
    Write,
    ReadWrite,
}

/// Everything the evaluator needs to know about a command invocation.
#[derive(Debug, Clone)]
pub struct Invocation<'a> {
    /// The command token, `parent|child` for subcommands.
    pub command: &'a str,
    pub categories: &'a [String],
    pub keys: &'a [Bytes],
    pub access: KeyAccess,
    pub channels: &'a [Bytes],
}

impl<'a> Invocation<'a> {
    pub fn new(command: &'a str, categories: &'a [String]) -> Self {
        Self {
            command,
            categories,
            keys: &[],
            access: KeyAccess::ReadWrite,
            channels: &[],
        }
    }

    pub fn with_keys(mut self, keys: &'a [Bytes], access: KeyAccess) -> Self {
        self.keys = keys;
        self.access = access;
        self
    }

    pub fn with_channels(mut self, channels: &'a [Bytes]) -> Self {
        self.channels = channels;
        self
    }
}

/// Why an invocation was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    UserDisabled,
    CommandExcluded,
    CategoryExcluded(String),
    CommandNotPermitted,
    KeyNotPermitted(String),
    ChannelNotPermitted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclVerdict {
    Allow,
    Deny(DenyReason),
}

impl AclVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AclVerdict::Allow)
    }

    /// Converts a verdict into the error reported to the client.
    pub fn into_result(self, user: &str, command: &str) -> Result<(), AclError> {
        let reason = match self {
            AclVerdict::Allow => return Ok(()),
            AclVerdict::Deny(reason) => reason,
        };
        let user = user.to_string();
        let command = command.to_string();
        Err(match reason {
            DenyReason::UserDisabled => AclError::UserDisabled(user),
            DenyReason::CommandExcluded => AclError::CommandExcluded { user, command },
            DenyReason::CategoryExcluded(category) => AclError::CategoryExcluded {
                user,
                command,
                category,
            },
            DenyReason::CommandNotPermitted => AclError::CommandNotPermitted { user, command },
            DenyReason::KeyNotPermitted(key) => AclError::KeyNotPermitted { user, key },
            DenyReason::ChannelNotPermitted(channel) => {
                AclError::ChannelNotPermitted { user, channel }
            }
        })
    }
}

/// Evaluates `invocation` against `user`. Stages run in a fixed order and any
/// stage may deny; only the last one allows.
pub fn authorize(user: &AclUser, invocation: &Invocation<'_>) -> AclVerdict {
    if !user.enabled {
        return AclVerdict::Deny(DenyReason::UserDisabled);
    }

    if command_listed(&user.excluded_commands, invocation.command) {
        return AclVerdict::Deny(DenyReason::CommandExcluded);
    }
    let command_granted = command_listed(&user.included_commands, invocation.command);

    if !command_granted {
        if let Some(category) = first_listed_category(&user.excluded_categories, invocation.categories)
        {
            return AclVerdict::Deny(DenyReason::CategoryExcluded(category));
        }
        if first_listed_category(&user.included_categories, invocation.categories).is_none() {
            return AclVerdict::Deny(DenyReason::CommandNotPermitted);
        }
    }

    if let Some(key) = invocation
        .keys
        .iter()
        .find(|key| !key_permitted(user, key, invocation.access))
    {
        return AclVerdict::Deny(DenyReason::KeyNotPermitted(
            String::from_utf8_lossy(key).into_owned(),
        ));
    }

    if let Some(channel) = invocation
        .channels
        .iter()
        .find(|channel| !channel_permitted(user, channel))
    {
        return AclVerdict::Deny(DenyReason::ChannelNotPermitted(
            String::from_utf8_lossy(channel).into_owned(),
        ));
    }

    AclVerdict::Allow
}

/// Exact token, wildcard, or the parent name of a `parent|child` token.
fn command_listed(set: &IndexSet<String>, token: &str) -> bool {
    set.contains(ALL)
        || set.contains(token)
        || token
            .split_once('|')
            .is_some_and(|(parent, _)| set.contains(parent))
}

/// The first category of the invocation present in `set`, or `all` for a
/// wildcard entry.
fn first_listed_category(set: &IndexSet<String>, categories: &[String]) -> Option<String> {
    if set.contains(ALL) {
        return Some("all".to_string());
    }
    categories.iter().find(|c| set.contains(c.as_str())).cloned()
}

fn key_permitted(user: &AclUser, key: &[u8], access: KeyAccess) -> bool {
    if user.included_keys.any_match(key) {
        return true;
    }
    match access {
        KeyAccess::Read => user.included_read_keys.any_match(key),
        KeyAccess::Write => user.included_write_keys.any_match(key),
        KeyAccess::ReadWrite => {
            user.included_read_keys.any_match(key) && user.included_write_keys.any_match(key)
        }
    }
}

fn channel_permitted(user: &AclUser, channel: &[u8]) -> bool {
    user.included_channels.any_match(channel) && !user.excluded_channels.any_match(channel)
}
