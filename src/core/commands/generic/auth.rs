// src/core/commands/generic/auth.rs

use crate::core::acl::AclError;
use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::extract_string;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// `AUTH [username] password`.
#[derive(Debug, Clone, PartialEq)]
pub struct Auth {
    pub username: Option<String>,
    pub password: String,
}

impl ParseCommand for Auth {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        match args {
            [password] => Ok(Auth {
                username: None,
                password: extract_string(password)?,
            }),
            [username, password] => Ok(Auth {
                username: Some(extract_string(username)?),
                password: extract_string(password)?,
            }),
            _ => Err(AclError::WrongArity("auth".to_string()).into()),
        }
    }
}

#[async_trait]
impl ExecutableCommand for Auth {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        match ctx
            .state
            .acl
            .authenticate(ctx.session_id, self.username.as_deref(), &self.password)
        {
            Ok(username) => {
                info!(
                    "Client {} authenticated as user '{}'.",
                    ctx.session_id, username
                );
                Ok(RespValue::ok())
            }
            Err(e) if e.is_auth_failure() => {
                warn!("Failed AUTH attempt from client {}: {}", ctx.session_id, e);
                ctx.state.stats.increment_auth_failures();
                let delay = ctx.state.acl.config().auth_failure_delay_ms;
                if delay > 0 {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(AclError::InvalidCredential.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}
