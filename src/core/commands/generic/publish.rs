// src/core/commands/generic/publish.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{extract_bytes, validate_arg_count};
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Publish {
    pub channel: Bytes,
    pub message: Bytes,
}

impl ParseCommand for Publish {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        validate_arg_count(args, 2, "publish")?;
        Ok(Publish {
            channel: extract_bytes(&args[0])?,
            message: extract_bytes(&args[1])?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Publish {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        let receivers = ctx
            .state
            .pubsub
            .publish(&self.channel, self.message.clone());
        Ok(RespValue::Integer(receivers as i64))
    }
}
