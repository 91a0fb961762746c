// src/core/commands/generic/acl.rs

use crate::core::acl::file::{load_acl_file, save_acl_file};
use crate::core::acl::serializer::{
    render_categories, render_commands_in_category, render_user_detail, render_user_list,
    render_usernames, render_whoami,
};
use crate::core::acl::{AclError, CATEGORY_INDEX};
use crate::core::commands::command_spec;
use crate::core::commands::command_trait::{ExecutableCommand, ParseCommand};
use crate::core::commands::helpers::extract_string;
use crate::core::database::ExecutionContext;
use crate::core::protocol::RespFrame;
use crate::core::state::CloseReason;
use crate::core::{KeyGateError, RespValue};
use async_trait::async_trait;
use tracing::info;

const HELP_HEADER: &str = "ACL <subcommand> [<arg> [value] [opt] ...]. Subcommands are:";

/// One name line and one indented summary line per subcommand, taken from
/// the command table.
fn help_lines() -> Vec<RespValue> {
    let subcommands = command_spec::lookup("acl").map_or(&[][..], |spec| spec.subcommands);
    let mut lines = vec![RespValue::SimpleString(HELP_HEADER.to_string())];
    for sub in subcommands {
        lines.push(RespValue::SimpleString(sub.name.to_ascii_uppercase()));
        lines.push(RespValue::SimpleString(format!("    {}", sub.summary)));
    }
    lines
}

/// Enum for ACL subcommands.
#[derive(Debug, Clone, PartialEq)]
pub enum AclSubcommand {
    Cat(Option<String>),
    DelUser(Vec<String>),
    GetUser(String),
    Help,
    List,
    Load,
    Save,
    SetUser { username: String, rules: Vec<String> },
    Users,
    WhoAmI,
}

/// The main ACL command struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Acl {
    pub subcommand: AclSubcommand,
}

impl ParseCommand for Acl {
    fn parse(args: &[RespFrame]) -> Result<Self, KeyGateError> {
        if args.is_empty() {
            return Err(AclError::WrongArity("acl".to_string()).into());
        }

        let sub_str = extract_string(&args[0])?.to_ascii_lowercase();
        let rest = &args[1..];
        let arity_error =
            || -> KeyGateError { AclError::WrongArity(format!("acl|{sub_str}")).into() };

        let subcommand = match sub_str.as_str() {
            "cat" => match rest {
                [] => AclSubcommand::Cat(None),
                [category] => AclSubcommand::Cat(Some(extract_string(category)?)),
                _ => return Err(arity_error()),
            },
            "deluser" => {
                if rest.is_empty() {
                    return Err(arity_error());
                }
                AclSubcommand::DelUser(
                    rest.iter()
                        .map(extract_string)
                        .collect::<Result<_, _>>()?,
                )
            }
            "getuser" => match rest {
                [username] => AclSubcommand::GetUser(extract_string(username)?),
                _ => return Err(arity_error()),
            },
            "setuser" => {
                let Some((username, rules)) = rest.split_first() else {
                    return Err(arity_error());
                };
                AclSubcommand::SetUser {
                    username: extract_string(username)?,
                    rules: rules
                        .iter()
                        .map(extract_string)
                        .collect::<Result<_, _>>()?,
                }
            }
            "help" | "list" | "load" | "save" | "users" | "whoami" => {
                if !rest.is_empty() {
                    return Err(arity_error());
                }
                match sub_str.as_str() {
                    "help" => AclSubcommand::Help,
                    "list" => AclSubcommand::List,
                    "load" => AclSubcommand::Load,
                    "save" => AclSubcommand::Save,
                    "users" => AclSubcommand::Users,
                    _ => AclSubcommand::WhoAmI,
                }
            }
            _ => {
                return Err(KeyGateError::UnknownSubcommand {
                    command: "acl".to_string(),
                    subcommand: sub_str.clone(),
                });
            }
        };
        Ok(Acl { subcommand })
    }
}

#[async_trait]
impl ExecutableCommand for Acl {
    async fn execute<'a>(
        &self,
        ctx: &mut ExecutionContext<'a>,
    ) -> Result<RespValue, KeyGateError> {
        match &self.subcommand {
            AclSubcommand::Cat(None) => Ok(render_categories(&CATEGORY_INDEX)),
            AclSubcommand::Cat(Some(category)) => {
                Ok(render_commands_in_category(&CATEGORY_INDEX, category)?)
            }
            AclSubcommand::DelUser(usernames) => handle_deluser(ctx, usernames),
            AclSubcommand::GetUser(username) => Ok(ctx
                .state
                .acl
                .get_user(username)
                .map_or(RespValue::Null, |user| render_user_detail(&user))),
            AclSubcommand::Help => Ok(RespValue::Array(help_lines())),
            AclSubcommand::List => Ok(render_user_list(&ctx.state.acl.users())),
            AclSubcommand::Load => handle_load(ctx).await,
            AclSubcommand::Save => handle_save(ctx).await,
            AclSubcommand::SetUser { username, rules } => {
                ctx.state.acl.set_user(username, rules)?;
                info!("ACL user '{}' updated with {} rules.", username, rules.len());
                Ok(RespValue::ok())
            }
            AclSubcommand::Users => Ok(render_usernames(ctx.state.acl.usernames())),
            AclSubcommand::WhoAmI => {
                Ok(render_whoami(ctx.state.acl.binding_of(ctx.session_id)?))
            }
        }
    }
}

fn handle_deluser(
    ctx: &mut ExecutionContext<'_>,
    usernames: &[String],
) -> Result<RespValue, KeyGateError> {
    let outcome = ctx.state.acl.delete_users(usernames)?;
    if outcome.count > 0 {
        info!("ACL DELUSER removed {} users.", outcome.count);
    }
    ctx.state
        .kill_clients(&outcome.revoked, CloseReason::UserDeleted);
    Ok(RespValue::Integer(outcome.count as i64))
}

async fn handle_load(ctx: &mut ExecutionContext<'_>) -> Result<RespValue, KeyGateError> {
    let path = acl_file_path(ctx)?;
    let users = load_acl_file(&path, ctx.state.acl.rule_options()).await?;
    let revoked = ctx.state.acl.replace_users(users)?;
    ctx.state
        .kill_clients(&revoked, CloseReason::UserRemovedByLoad);
    info!("ACL rules reloaded from '{}'.", path);
    Ok(RespValue::ok())
}

async fn handle_save(ctx: &mut ExecutionContext<'_>) -> Result<RespValue, KeyGateError> {
    let path = acl_file_path(ctx)?;
    let users = ctx.state.acl.users();
    save_acl_file(&path, &users).await?;
    Ok(RespValue::ok())
}

fn acl_file_path(ctx: &ExecutionContext<'_>) -> Result<String, AclError> {
    ctx.state
        .config
        .acl_file
        .clone()
        .ok_or(AclError::AclFileNotConfigured)
}
