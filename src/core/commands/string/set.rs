// src/core/commands/string/set.rs

use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::{ArgParser, extract_bytes};
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use bytes::Bytes;

/// Defines the condition for `SET` execution (`NX` or `XX`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SetCondition {
    #[default]
    None,
    /// `XX`: only set if the key already exists.
    IfExists,
    /// `NX`: only set if the key does not already exist.
    IfNotExists,
}

/// `SET key value [NX|XX]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Set {
    pub key: Bytes,
    pub value: Bytes,
    pub condition: SetCondition,
}

impl ParseCommand for Set {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        if args.len() < 2 {
            return Err(KeyGateError::WrongArgumentCount("set".to_string()));
        }
        let mut cmd = Set {
            key: extract_bytes(&args[0])?,
            value: extract_bytes(&args[1])?,
            ..Default::default()
        };

        let mut parser = ArgParser::new(&args[2..]);
        loop {
            if parser.match_flag("nx") {
                if cmd.condition != SetCondition::None {
                    return Err(KeyGateError::SyntaxError);
                }
                cmd.condition = SetCondition::IfNotExists;
            } else if parser.match_flag("xx") {
                if cmd.condition != SetCondition::None {
                    return Err(KeyGateError::SyntaxError);
                }
                cmd.condition = SetCondition::IfExists;
            } else {
                break;
            }
        }

        if !parser.remaining_args().is_empty() {
            return Err(KeyGateError::SyntaxError);
        }
        Ok(cmd)
    }
}

#[async_trait]
impl ExecutableCommand for Set {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        let written = match self.condition {
            SetCondition::None => {
                ctx.db.set(self.key.clone(), self.value.clone());
                true
            }
            SetCondition::IfNotExists => ctx.db.set_if_absent(self.key.clone(), self.value.clone()),
            SetCondition::IfExists => ctx.db.set_if_present(self.key.clone(), self.value.clone()),
        };
        Ok(if written { RespValue::ok() } else { RespValue::Null })
    }
}
