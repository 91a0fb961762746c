// src/core/commands/generic/quit.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;

/// `QUIT`. Replies `+OK`; the router then tells the connection to close.
/// Extra arguments are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quit;

impl ParseCommand for Quit {
    fn parse(_args: &[RespFrame]) -> Result<Self, KeyGateError> {
        Ok(Quit)
    }
}

#[async_trait]
impl ExecutableCommand for Quit {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        Ok(RespValue::ok())
    }
}
