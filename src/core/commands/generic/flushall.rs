// src/core/commands/generic/flushall.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::ArgParser;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use tracing::info;

/// Represents the `FLUSHALL [SYNC|ASYNC]` command. Both modes flush synchronously.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushAll;

impl ParseCommand for FlushAll {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        let mut parser = ArgParser::new(args);
        let _ = parser.match_flag("sync") || parser.match_flag("async");
        if !parser.remaining_args().is_empty() {
            return Err(KeyGateError::SyntaxError);
        }
        Ok(FlushAll)
    }
}

#[async_trait]
impl ExecutableCommand for FlushAll {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        let removed = ctx.db.clear();
        info!(
            "FLUSHALL by client {} removed {} keys.",
            ctx.session_id, removed
        );
        Ok(RespValue::ok())
    }
}
