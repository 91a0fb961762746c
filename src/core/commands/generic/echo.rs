// src/core/commands/generic/echo.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Echo {
    pub message: Bytes,
}

impl ParseCommand for Echo {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        validate_arg_count(args, 1, "echo")?;
        Ok(Echo {
            message: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Echo {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        Ok(RespValue::BulkString(self.message.clone()))
    }
}
