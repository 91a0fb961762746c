// src/core/commands/command_trait.rs

//! Defines the core traits for all executable commands.

use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bitflags::bitflags;

bitflags! {
    /// Flags that describe the properties and behavior of a command.
    /// These are used by the router and the ACL check to handle commands appropriately.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CommandFlags: u32 {
        /// The command modifies the dataset.
        const WRITE          = 1 << 0;
        /// The command only reads data.
        const READONLY       = 1 << 1;
        /// The command runs without any permission check (e.g. `AUTH`).
        const NO_AUTH        = 1 << 9;
        /// The command only has subcommands and cannot run on its own.
        const CONTAINER      = 1 << 10;
    }
}

/// A composite trait implemented on the main `Command` enum.
#[async_trait]
pub trait CommandExt {
    /// Executes the command within a given `ExecutionContext`.
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>)
    -> Result<RespValue, KeyGateError>;
}

/// A trait for the actual execution logic of a command.
/// Implemented by each command's struct (e.g., `Get`, `Set`).
#[async_trait]
pub trait ExecutableCommand {
    /// The core logic for the command's execution.
    async fn execute<'a>(&self, ctx: &mut ExecutionContext<'a>)
    -> Result<RespValue, KeyGateError>;
}

/// A trait for parsing a command's arguments from a slice of `RespFrame`.
pub trait ParseCommand: Sized {
    /// Parses the arguments and returns an instance of the command struct.
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError>;
}
