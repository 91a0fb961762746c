// src/core/commands/string/mget.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_keys;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MGet {
    pub keys: Vec<Bytes>,
}

impl ParseCommand for MGet {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        Ok(MGet {
            keys: parse_keys(args, "mget")?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for MGet {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        let values = self
            .keys
            .iter()
            .map(|key| ctx.db.get(key).map_or(RespValue::Null, RespValue::BulkString))
            .collect();
        Ok(RespValue::Array(values))
    }
}
