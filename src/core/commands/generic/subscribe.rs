// src/core/commands/generic/subscribe.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_keys;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// `SUBSCRIBE channel [channel ...]`. The subscription itself lives in the
/// connection handler, which receives the channels through the router.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subscribe {
    pub channels: Vec<Bytes>,
}

impl ParseCommand for Subscribe {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        Ok(Subscribe {
            channels: parse_keys(args, "subscribe")?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Subscribe {
    async fn execute<'a>(
        &self,
        _ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        Err(KeyGateError::Internal(
            "SUBSCRIBE is handled by the connection".into(),
        ))
    }
}
