// src/core/commands/generic/exists.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::parse_keys;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// `EXISTS key [key ...]`. A key named twice is counted twice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exists {
    pub keys: Vec<Bytes>,
}

impl ParseCommand for Exists {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        Ok(Exists {
            keys: parse_keys(args, "exists")?,
        })
    }
}

#[async_trait]
impl ExecutableCommand for Exists {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        let count = self.keys.iter().filter(|key| ctx.db.contains(key)).count();
        Ok(RespValue::Integer(count as i64))
    }
}
