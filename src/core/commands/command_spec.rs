// src/core/commands/command_spec.rs

//! The static command table. Each `CommandSpec` record carries the metadata the
//! router and the ACL engine need before a command is parsed: arity, flags,
//! ACL categories, the sync flag and how to pull keys and channels out of the
//! raw arguments.

use crate::core::KeyGateError;
use crate::core::acl::KeyAccess;
use crate::core::commands::command_trait::CommandFlags;
use crate::core::commands::key_extractor::{all_args, first_arg, no_args};
use crate::core::protocol::RespFrame;
use bytes::Bytes;

/// Pulls keys or channels out of a command's arguments (command name excluded).
pub type ArgExtractor = fn(&[RespFrame]) -> Result<Vec<Bytes>, KeyGateError>;

/// Metadata describing one command or subcommand.
#[derive(Debug)]
pub struct CommandSpec {
    /// The name of the command in lowercase.
    pub name: &'static str,
    /// The arity of the command, counting the command name (and the subcommand
    /// name for subcommands).
    /// - Positive integer: fixed number of arguments.
    /// - Negative integer: minimum number of arguments.
    pub arity: i64,
    pub flags: CommandFlags,
    /// The ACL categories this command belongs to.
    pub categories: &'static [&'static str],
    /// Sync commands are executed one at a time across the whole server.
    pub sync: bool,
    pub keys: ArgExtractor,
    pub channels: ArgExtractor,
    pub subcommands: &'static [CommandSpec],
    pub summary: &'static str,
}

impl CommandSpec {
    /// Checks an argument count (command name included) against the arity.
    pub fn check_arity(&self, argc: usize) -> bool {
        if self.arity >= 0 {
            argc as i64 == self.arity
        } else {
            argc as i64 >= -self.arity
        }
    }

    /// Finds a subcommand by name, case-insensitively.
    pub fn subcommand(&self, name: &str) -> Option<&'static CommandSpec> {
        self.subcommands
            .iter()
            .find(|sub| sub.name.eq_ignore_ascii_case(name))
    }

    /// The access mode the command needs on its keys.
    pub fn key_access(&self) -> KeyAccess {
        if self.flags.contains(CommandFlags::WRITE) {
            KeyAccess::Write
        } else if self.flags.contains(CommandFlags::READONLY) {
            KeyAccess::Read
        } else {
            KeyAccess::ReadWrite
        }
    }
}

/// Looks up a top-level command by name, case-insensitively.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMAND_TABLE
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

const ADMIN_CATEGORIES: &[&str] = &["admin", "slow", "dangerous"];

const fn acl_subcommand(
    name: &'static str,
    arity: i64,
    categories: &'static [&'static str],
    sync: bool,
    summary: &'static str,
) -> CommandSpec {
    CommandSpec {
        name,
        arity,
        flags: CommandFlags::empty(),
        categories,
        sync,
        keys: no_args,
        channels: no_args,
        subcommands: &[],
        summary,
    }
}

const ACL_SUBCOMMANDS: &[CommandSpec] = &[
    acl_subcommand(
        "cat",
        -2,
        &["slow"],
        false,
        "List the ACL categories or the commands inside a category.",
    ),
    acl_subcommand(
        "deluser",
        -3,
        ADMIN_CATEGORIES,
        true,
        "Remove the specified ACL users and the associated rules.",
    ),
    acl_subcommand(
        "getuser",
        3,
        ADMIN_CATEGORIES,
        false,
        "Get the rules for a specific ACL user.",
    ),
    acl_subcommand(
        "help",
        2,
        &["slow"],
        false,
        "Show helpful text about the different subcommands.",
    ),
    acl_subcommand(
        "list",
        2,
        ADMIN_CATEGORIES,
        true,
        "List the current ACL rules in ACL config file format.",
    ),
    acl_subcommand(
        "load",
        2,
        ADMIN_CATEGORIES,
        true,
        "Reload the ACLs from the configured ACL file.",
    ),
    acl_subcommand(
        "save",
        2,
        ADMIN_CATEGORIES,
        true,
        "Save the current ACL rules in the configured ACL file.",
    ),
    acl_subcommand(
        "setuser",
        -3,
        ADMIN_CATEGORIES,
        true,
        "Modify or create the rules for a specific ACL user.",
    ),
    acl_subcommand(
        "users",
        2,
        ADMIN_CATEGORIES,
        false,
        "List the username of all the configured ACL rules.",
    ),
    acl_subcommand(
        "whoami",
        2,
        &["fast"],
        true,
        "Return the name of the user associated to the current connection.",
    ),
];

/// Every command the server understands.
pub static COMMAND_TABLE: &[CommandSpec] = &[
    CommandSpec {
        name: "acl",
        arity: -2,
        flags: CommandFlags::CONTAINER,
        categories: &[],
        sync: false,
        keys: no_args,
        channels: no_args,
        subcommands: ACL_SUBCOMMANDS,
        summary: "A container for Access List Control commands.",
    },
    CommandSpec {
        name: "auth",
        arity: -2,
        flags: CommandFlags::NO_AUTH,
        categories: &["connection", "fast"],
        sync: false,
        keys: no_args,
        channels: no_args,
        subcommands: &[],
        summary: "Authenticate to the server.",
    },
    CommandSpec {
        name: "ping",
        arity: -1,
        flags: CommandFlags::empty(),
        categories: &["connection", "fast"],
        sync: false,
        keys: no_args,
        channels: no_args,
        subcommands: &[],
        summary: "Ping the server.",
    },
    CommandSpec {
        name: "echo",
        arity: 2,
        flags: CommandFlags::empty(),
        categories: &["connection", "fast"],
        sync: false,
        keys: no_args,
        channels: no_args,
        subcommands: &[],
        summary: "Echo the given string.",
    },
    CommandSpec {
        name: "quit",
        arity: -1,
        flags: CommandFlags::NO_AUTH,
        categories: &["connection", "fast"],
        sync: false,
        keys: no_args,
        channels: no_args,
        subcommands: &[],
        summary: "Close the connection.",
    },
    CommandSpec {
        name: "get",
        arity: 2,
        flags: CommandFlags::READONLY,
        categories: &["read", "string", "fast"],
        sync: false,
        keys: first_arg,
        channels: no_args,
        subcommands: &[],
        summary: "Get the value of a key.",
    },
    CommandSpec {
        name: "set",
        arity: -3,
        flags: CommandFlags::WRITE,
        categories: &["write", "string", "slow"],
        sync: false,
        keys: first_arg,
        channels: no_args,
        subcommands: &[],
        summary: "Set the string value of a key.",
    },
    CommandSpec {
        name: "mget",
        arity: -2,
        flags: CommandFlags::READONLY,
        categories: &["read", "string", "fast"],
        sync: false,
        keys: all_args,
        channels: no_args,
        subcommands: &[],
        summary: "Get the values of all the given keys.",
    },
    CommandSpec {
        name: "del",
        arity: -2,
        flags: CommandFlags::WRITE,
        categories: &["write", "keyspace", "slow"],
        sync: false,
        keys: all_args,
        channels: no_args,
        subcommands: &[],
        summary: "Delete one or more keys.",
    },
    CommandSpec {
        name: "exists",
        arity: -2,
        flags: CommandFlags::READONLY,
        categories: &["read", "keyspace", "fast"],
        sync: false,
        keys: all_args,
        channels: no_args,
        subcommands: &[],
        summary: "Determine how many of the given keys exist.",
    },
    CommandSpec {
        name: "flushall",
        arity: -1,
        flags: CommandFlags::WRITE,
        categories: &["write", "keyspace", "slow", "dangerous"],
        sync: true,
        keys: no_args,
        channels: no_args,
        subcommands: &[],
        summary: "Remove all keys.",
    },
    CommandSpec {
        name: "publish",
        arity: 3,
        flags: CommandFlags::empty(),
        categories: &["pubsub", "fast"],
        sync: false,
        keys: no_args,
        channels: first_arg,
        subcommands: &[],
        summary: "Post a message to a channel.",
    },
    CommandSpec {
        name: "subscribe",
        arity: -2,
        flags: CommandFlags::empty(),
        categories: &["pubsub", "slow"],
        sync: false,
        keys: no_args,
        channels: all_args,
        subcommands: &[],
        summary: "Listen for messages published to the given channels.",
    },
];
