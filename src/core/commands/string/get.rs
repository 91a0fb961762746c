// src/core/commands/string/get.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Get {
    pub key: Bytes,
}

impl ParseCommand for Get {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        validate_arg_count(args, 1, "get")?;
        Ok(Get {
            key: extract_bytes(&args[0])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Get {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        Ok(ctx
            .db
            .get(&self.key)
            .map_or(RespValue::Null, RespValue::BulkString))
    }
}
