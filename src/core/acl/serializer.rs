// src/core/acl/serializer.rs

//! Renders ACL state into wire replies and into the rule-line format shared
//! by `ACL LIST` and the ACL file.

use super::category::CategoryIndex;
use super::error::AclError;
use super::pattern::PatternSet;
use super::user::{ALL, AclUser, PasswordKind};
use crate::core::RespValue;
use indexmap::IndexSet;

/// `ACL USERS`.
pub fn render_usernames(usernames: Vec<String>) -> RespValue {
    RespValue::bulk_array(usernames)
}

/// `ACL CAT` without an argument.
pub fn render_categories(index: &CategoryIndex) -> RespValue {
    RespValue::bulk_array(index.category_names())
}

/// `ACL CAT <category>`.
pub fn render_commands_in_category(
    index: &CategoryIndex,
    category: &str,
) -> Result<RespValue, AclError> {
    index
        .commands_of(category)
        .map(|commands| RespValue::bulk_array(commands.iter().map(String::as_str)))
        .ok_or_else(|| AclError::CategoryNotFound(category.to_string()))
}

/// `ACL WHOAMI`.
pub fn render_whoami(username: String) -> RespValue {
    RespValue::SimpleString(username)
}

/// `ACL LIST`: one rule line per user.
pub fn render_user_list(users: &[AclUser]) -> RespValue {
    RespValue::bulk_array(users.iter().map(render_user_rule))
}

/// Renders a user as a single rule line. The line re-parses to an
/// equivalent user.
pub fn render_user_rule(user: &AclUser) -> String {
    let mut tokens = vec![user.username.clone(), flag_token(user).to_string()];
    tokens.extend(password_tokens(user));
    tokens.extend(category_tokens(user));
    tokens.extend(command_tokens(user));
    tokens.extend(key_tokens(user));
    tokens.extend(channel_tokens(user));
    tokens.join(" ")
}

/// `ACL GETUSER`: a flat map of field name to token list.
pub fn render_user_detail(user: &AclUser) -> RespValue {
    let fields = [
        ("flags", vec![flag_token(user).to_string()]),
        ("passwords", password_tokens(user)),
        ("categories", category_tokens(user)),
        ("commands", command_tokens(user)),
        ("keys", key_tokens(user)),
        ("channels", channel_tokens(user)),
    ];
    RespValue::Array(
        fields
            .into_iter()
            .flat_map(|(name, tokens)| [RespValue::bulk(name), RespValue::bulk_array(tokens)])
            .collect(),
    )
}

fn flag_token(user: &AclUser) -> &'static str {
    if user.enabled { "on" } else { "off" }
}

fn password_tokens(user: &AclUser) -> Vec<String> {
    user.passwords
        .iter()
        .map(|entry| match entry.kind {
            PasswordKind::Plaintext => entry.value.clone(),
            PasswordKind::Hashed => format!("#{}", entry.value),
        })
        .collect()
}

fn category_tokens(user: &AclUser) -> Vec<String> {
    let mut tokens = prefixed(&user.included_categories, "+@", "all");
    tokens.extend(prefixed(&user.excluded_categories, "-@", "all"));
    tokens
}

fn command_tokens(user: &AclUser) -> Vec<String> {
    let mut tokens = prefixed(&user.included_commands, "+", "all");
    tokens.extend(prefixed(&user.excluded_commands, "-", "all"));
    tokens
}

fn key_tokens(user: &AclUser) -> Vec<String> {
    let mut tokens = patterns(&user.included_keys, "%RW~");
    tokens.extend(patterns(&user.included_read_keys, "%R~"));
    tokens.extend(patterns(&user.included_write_keys, "%W~"));
    tokens
}

fn channel_tokens(user: &AclUser) -> Vec<String> {
    let mut tokens = patterns(&user.included_channels, "+&");
    tokens.extend(patterns(&user.excluded_channels, "-&"));
    tokens
}

fn prefixed(set: &IndexSet<String>, prefix: &str, wildcard_name: &str) -> Vec<String> {
    set.iter()
        .map(|name| {
            let name = if name == ALL { wildcard_name } else { name };
            format!("{prefix}{name}")
        })
        .collect()
}

fn patterns(set: &PatternSet, prefix: &str) -> Vec<String> {
    set.iter().map(|p| format!("{prefix}{}", p.as_str())).collect()
}
