// src/core/commands/generic/del.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_keys;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Del {
    pub keys: Vec<Bytes>,
}

impl ParseCommand for Del {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        Ok(Del {
            keys: parse_keys(args, "del")?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Del {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        let count = self.keys.iter().filter(|key| ctx.db.remove(key)).count();
        Ok(RespValue::Integer(count as i64))
    }
}
