// src/core/commands/request.rs

//! A resolved request: the raw frame matched against the command table but not
//! yet parsed into a `Command`. The ACL check runs on this form so that a
//! denied command is never parsed.

use crate::core::KeyGateError;
use crate::core::acl::{CATEGORY_INDEX, KeyAccess};
use crate::core::commands::Command;
use crate::core::commands::command_spec::{CommandSpec, lookup};
use crate::core::commands::command_trait::CommandFlags;
use crate::core::commands::helpers::extract_string;
use crate::core::protocol::RespFrame;
use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// The top-level command.
    pub spec: &'static CommandSpec,
    /// The subcommand for container commands, otherwise `spec`.
    pub effective: &'static CommandSpec,
    /// `name` or `parent|child`.
    pub token: String,
    /// Everything after the command name.
    pub args: Vec<RespFrame>,
    is_subcommand: bool,
}

impl CommandRequest {
    pub fn from_frame(frame: RespFrame) -> Result<Self, KeyGateError> {
        let RespFrame::Array(mut parts) = frame else {
            return Err(KeyGateError::InvalidRequest(
                "command must be an array of bulk strings".into(),
            ));
        };
        if parts.is_empty() {
            return Err(KeyGateError::InvalidRequest("empty command".into()));
        }

        let name = extract_string(&parts[0])?.to_ascii_lowercase();
        let spec = lookup(&name).ok_or_else(|| KeyGateError::UnknownCommand(name.clone()))?;
        let argc = parts.len();
        let args = parts.split_off(1);

        if !spec.check_arity(argc) {
            return Err(KeyGateError::WrongArgumentCount(spec.name.to_string()));
        }

        if !spec.flags.contains(CommandFlags::CONTAINER) {
            return Ok(Self {
                spec,
                effective: spec,
                token: spec.name.to_string(),
                args,
                is_subcommand: false,
            });
        }

        let sub_name = extract_string(&args[0])?.to_ascii_lowercase();
        let effective =
            spec.subcommand(&sub_name)
                .ok_or_else(|| KeyGateError::UnknownSubcommand {
                    command: spec.name.to_string(),
                    subcommand: sub_name.clone(),
                })?;
        let token = format!("{}|{}", spec.name, effective.name);
        if !effective.check_arity(argc) {
            return Err(KeyGateError::WrongArgumentCount(token));
        }
        Ok(Self {
            spec,
            effective,
            token,
            args,
            is_subcommand: true,
        })
    }

    /// The arguments the key and channel extractors see.
    fn extractor_args(&self) -> &[RespFrame] {
        if self.is_subcommand {
            &self.args[1..]
        } else {
            &self.args
        }
    }

    pub fn keys(&self) -> Result<Vec<Bytes>, KeyGateError> {
        (self.effective.keys)(self.extractor_args())
    }

    pub fn channels(&self) -> Result<Vec<Bytes>, KeyGateError> {
        (self.effective.channels)(self.extractor_args())
    }

    pub fn key_access(&self) -> KeyAccess {
        self.effective.key_access()
    }

    pub fn categories(&self) -> &'static [String] {
        CATEGORY_INDEX.categories_of(&self.token)
    }

    pub fn flags(&self) -> CommandFlags {
        self.spec.flags | self.effective.flags
    }

    pub fn parse(&self) -> Result<Command, KeyGateError> {
        Command::parse_named(self.spec.name, &self.args)
    }
}
