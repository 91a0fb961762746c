// src/core/commands/generic/ping.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::extract_bytes;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ping {
    pub message: Option<Bytes>,
}

impl ParseCommand for Ping {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        match args {
            [] => Ok(Ping { message: None }),
            [message] => Ok(Ping {
                message: Some(extract_bytes(message)?),
            }),
            _ => Err(KeyGateError::WrongArgumentCount("ping".to_string())),
        }
    }
}

#[async_trait]
impl ExecutableCommand for Ping {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        Ok(match &self.message {
            Some(msg) => RespValue::BulkString(msg.clone()),
            None => RespValue::SimpleString("PONG".into()),
        })
    }
}
