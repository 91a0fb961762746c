// src/core/acl/rules.rs

//! Parsing and application of ACL rule tokens, the grammar shared by
//! `ACL SETUSER` and ACL file lines.

use super::category::CATEGORY_INDEX;
use super::error::AclError;
use super::password::{PasswordHashAlgorithm, hash_password, normalize_digest};
use super::pattern::GlobPattern;
use super::user::{ALL, AclUser, PasswordEntry};

/// The access mode granted by a key pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPermission {
    /// `~pattern`, `%RW~pattern`, `allkeys`.
    ReadWrite,
    /// `%R~pattern`.
    Read,
    /// `%W~pattern`.
    Write,
}

/// Options that influence how rule tokens are parsed and applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleOptions {
    /// Reject category and command names unknown to the command table.
    pub strict: bool,
    /// Algorithm used for passwords added with `>password`.
    pub password_hash: PasswordHashAlgorithm,
}

/// A single parsed rule token.
#[derive(Debug, Clone, PartialEq)]
pub enum AclRule {
    On,
    Off,
    /// `>password`: stored hashed.
    AddPassword(String),
    /// `<password`: removes any entry accepting this password.
    RemovePassword(String),
    /// `#digest`: an already-hashed password.
    AddDigest(String),
    /// `!digest`: removes a hashed entry by digest.
    RemoveDigest(String),
    /// Any bare token that is not a keyword: a plaintext password.
    PlaintextPassword(String),
    ResetPasswords,
    AllowCategory(String),
    DenyCategory(String),
    AllowCommand(String),
    DenyCommand(String),
    KeyPattern {
        permission: KeyPermission,
        pattern: GlobPattern,
    },
    AllowChannel(GlobPattern),
    DenyChannel(GlobPattern),
    ResetKeys,
    ResetChannels,
    Reset,
}

impl AclRule {
    /// Parses one token of the rule grammar.
    pub fn parse(token: &str, options: &RuleOptions) -> Result<Self, AclError> {
        if token.is_empty() {
            return Err(AclError::invalid_rule(token, "empty rule"));
        }

        match token.to_ascii_lowercase().as_str() {
            "on" => return Ok(AclRule::On),
            "off" => return Ok(AclRule::Off),
            "resetpass" => return Ok(AclRule::ResetPasswords),
            "resetkeys" => return Ok(AclRule::ResetKeys),
            "resetchannels" => return Ok(AclRule::ResetChannels),
            "reset" => return Ok(AclRule::Reset),
            "allcommands" => return Ok(AclRule::AllowCommand(ALL.to_string())),
            "nocommands" => return Ok(AclRule::DenyCategory(ALL.to_string())),
            "allkeys" => {
                return Ok(AclRule::KeyPattern {
                    permission: KeyPermission::ReadWrite,
                    pattern: GlobPattern::new(ALL)?,
                });
            }
            "allchannels" => return Ok(AclRule::AllowChannel(GlobPattern::new(ALL)?)),
            _ => {}
        }

        if let Some(password) = token.strip_prefix('>') {
            return Ok(AclRule::AddPassword(password.to_string()));
        }
        if let Some(password) = token.strip_prefix('<') {
            return Ok(AclRule::RemovePassword(password.to_string()));
        }
        if let Some(digest) = token.strip_prefix('#') {
            let digest = normalize_digest(digest)
                .ok_or_else(|| AclError::invalid_rule(token, "malformed password digest"))?;
            return Ok(AclRule::AddDigest(digest));
        }
        if let Some(digest) = token.strip_prefix('!') {
            let digest = normalize_digest(digest)
                .ok_or_else(|| AclError::invalid_rule(token, "malformed password digest"))?;
            return Ok(AclRule::RemoveDigest(digest));
        }
        if let Some(category) = token.strip_prefix("+@") {
            return Ok(AclRule::AllowCategory(Self::category_name(
                token, category, options,
            )?));
        }
        if let Some(category) = token.strip_prefix("-@") {
            return Ok(AclRule::DenyCategory(Self::category_name(
                token, category, options,
            )?));
        }
        if let Some(channel) = token.strip_prefix("+&").or_else(|| token.strip_prefix('&')) {
            return Ok(AclRule::AllowChannel(GlobPattern::new(channel)?));
        }
        if let Some(channel) = token.strip_prefix("-&") {
            return Ok(AclRule::DenyChannel(GlobPattern::new(channel)?));
        }
        if let Some(command) = token.strip_prefix('+') {
            return Ok(AclRule::AllowCommand(Self::command_name(
                token, command, options,
            )?));
        }
        if let Some(command) = token.strip_prefix('-') {
            return Ok(AclRule::DenyCommand(Self::command_name(
                token, command, options,
            )?));
        }
        if let Some(pattern) = token.strip_prefix('~') {
            return Ok(AclRule::KeyPattern {
                permission: KeyPermission::ReadWrite,
                pattern: GlobPattern::new(pattern)?,
            });
        }
        if let Some(rest) = token.strip_prefix('%') {
            let (flags, pattern) = rest
                .split_once('~')
                .ok_or_else(|| AclError::invalid_rule(token, "expected '%<flags>~<pattern>'"))?;
            let flags = flags.to_ascii_uppercase();
            let permission = match flags.as_str() {
                "R" => KeyPermission::Read,
                "W" => KeyPermission::Write,
                "RW" | "WR" => KeyPermission::ReadWrite,
                _ => return Err(AclError::invalid_rule(token, "key flags must be R, W or RW")),
            };
            return Ok(AclRule::KeyPattern {
                permission,
                pattern: GlobPattern::new(pattern)?,
            });
        }

        if token.chars().any(char::is_whitespace) {
            return Err(AclError::invalid_rule(token, "passwords cannot contain whitespace"));
        }
        Ok(AclRule::PlaintextPassword(token.to_string()))
    }

    fn category_name(token: &str, name: &str, options: &RuleOptions) -> Result<String, AclError> {
        if name.is_empty() {
            return Err(AclError::invalid_rule(token, "missing category name"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(AclError::invalid_rule(
                token,
                "category names cannot contain whitespace",
            ));
        }
        let name = name.to_ascii_lowercase();
        if name == "all" || name == ALL {
            return Ok(ALL.to_string());
        }
        if options.strict && !CATEGORY_INDEX.is_known_category(&name) {
            return Err(AclError::invalid_rule(token, format!("unknown category '{name}'")));
        }
        Ok(name)
    }

    fn command_name(token: &str, name: &str, options: &RuleOptions) -> Result<String, AclError> {
        if name.is_empty() || name.starts_with('|') || name.ends_with('|') {
            return Err(AclError::invalid_rule(token, "missing command name"));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(AclError::invalid_rule(
                token,
                "command names cannot contain whitespace",
            ));
        }
        let name = name.to_ascii_lowercase();
        if name == "all" || name == ALL {
            return Ok(ALL.to_string());
        }
        if options.strict && !CATEGORY_INDEX.is_known_command(&name) {
            return Err(AclError::invalid_rule(token, format!("unknown command '{name}'")));
        }
        Ok(name)
    }

    /// Applies this rule to `user` in place.
    pub fn apply(self, user: &mut AclUser, options: &RuleOptions) -> Result<(), AclError> {
        match self {
            AclRule::On => user.enabled = true,
            AclRule::Off => user.enabled = false,
            AclRule::AddPassword(password) => {
                if !user.check_password(&password) {
                    let digest = hash_password(&password, options.password_hash)?;
                    user.add_password(PasswordEntry::hashed(digest));
                }
            }
            AclRule::RemovePassword(password) => user.remove_password_matching(&password),
            AclRule::AddDigest(digest) => user.add_password(PasswordEntry::hashed(digest)),
            AclRule::RemoveDigest(digest) => user.remove_digest(&digest),
            AclRule::PlaintextPassword(password) => {
                user.add_password(PasswordEntry::plaintext(password))
            }
            AclRule::ResetPasswords => user.passwords.clear(),
            AclRule::AllowCategory(category) => {
                user.included_categories.insert(category);
            }
            AclRule::DenyCategory(category) => {
                user.excluded_categories.insert(category);
            }
            AclRule::AllowCommand(command) => {
                user.included_commands.insert(command);
            }
            AclRule::DenyCommand(command) => {
                user.excluded_commands.insert(command);
            }
            AclRule::KeyPattern {
                permission,
                pattern,
            } => {
                let set = match permission {
                    KeyPermission::ReadWrite => &mut user.included_keys,
                    KeyPermission::Read => &mut user.included_read_keys,
                    KeyPermission::Write => &mut user.included_write_keys,
                };
                set.insert(pattern);
            }
            AclRule::AllowChannel(pattern) => {
                user.included_channels.insert(pattern);
            }
            AclRule::DenyChannel(pattern) => {
                user.excluded_channels.insert(pattern);
            }
            AclRule::ResetKeys => user.reset_keys(),
            AclRule::ResetChannels => user.reset_channels(),
            AclRule::Reset => user.reset(),
        }
        Ok(())
    }
}

/// Checks that a username is usable as the first token of an ACL file line.
pub fn validate_username(username: &str) -> Result<(), AclError> {
    if username.is_empty() {
        return Err(AclError::invalid_rule(username, "username cannot be empty"));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(AclError::invalid_rule(
            username,
            "username cannot contain whitespace",
        ));
    }
    Ok(())
}

/// Parses every token, then applies them in order to a copy of `user`.
/// On any failure the original is left untouched.
pub fn apply_rules<S: AsRef<str>>(
    user: &AclUser,
    tokens: &[S],
    options: &RuleOptions,
) -> Result<AclUser, AclError> {
    let mut updated = user.clone();
    for token in tokens {
        AclRule::parse(token.as_ref(), options)?.apply(&mut updated, options)?;
    }
    Ok(updated)
}
