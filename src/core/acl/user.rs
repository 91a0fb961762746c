// src/core/acl/user.rs

//! Defines the structure for an ACL user record.

use super::password::{constant_time_eq, verify_digest};
use super::pattern::PatternSet;
use indexmap::IndexSet;

/// The name of the user every new connection is bound to.
pub const DEFAULT_USERNAME: &str = "default";

/// The wildcard stored in command and category sets for `all`.
pub const ALL: &str = "*";

/// How a stored password is compared against a presented one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordKind {
    Plaintext,
    Hashed,
}

/// A single credential attached to a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordEntry {
    pub kind: PasswordKind,
    /// The plaintext itself, or a SHA-256 hex digest / Argon2 PHC string.
    pub value: String,
}

impl PasswordEntry {
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self {
            kind: PasswordKind::Plaintext,
            value: value.into(),
        }
    }

    pub fn hashed(digest: impl Into<String>) -> Self {
        Self {
            kind: PasswordKind::Hashed,
            value: digest.into(),
        }
    }

    /// Checks a presented password against this entry.
    pub fn matches(&self, presented: &str) -> bool {
        match self.kind {
            PasswordKind::Plaintext => constant_time_eq(self.value.as_bytes(), presented.as_bytes()),
            PasswordKind::Hashed => verify_digest(presented, &self.value),
        }
    }
}

/// Represents a single user in the ACL system.
///
/// Command and category sets hold lowercase names, with `*` standing for
/// `all`. Include and exclude sets are kept independently; evaluation gives
/// exclusions precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct AclUser {
    pub username: String,
    /// A disabled user cannot authenticate and every command it issues is denied.
    pub enabled: bool,
    pub passwords: Vec<PasswordEntry>,
    pub included_categories: IndexSet<String>,
    pub excluded_categories: IndexSet<String>,
    pub included_commands: IndexSet<String>,
    pub excluded_commands: IndexSet<String>,
    /// Patterns granting both read and write access (`~p`, `%RW~p`).
    pub included_keys: PatternSet,
    /// Patterns granting read-only access (`%R~p`).
    pub included_read_keys: PatternSet,
    /// Patterns granting write-only access (`%W~p`).
    pub included_write_keys: PatternSet,
    pub included_channels: PatternSet,
    pub excluded_channels: PatternSet,
}

impl AclUser {
    /// Creates a disabled user with no passwords and no permissions.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            enabled: false,
            passwords: Vec::new(),
            included_categories: IndexSet::new(),
            excluded_categories: IndexSet::new(),
            included_commands: IndexSet::new(),
            excluded_commands: IndexSet::new(),
            included_keys: PatternSet::new(),
            included_read_keys: PatternSet::new(),
            included_write_keys: PatternSet::new(),
            included_channels: PatternSet::new(),
            excluded_channels: PatternSet::new(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.username == DEFAULT_USERNAME
    }

    /// Adds a password entry unless an identical one is already present.
    pub fn add_password(&mut self, entry: PasswordEntry) {
        if !self.passwords.contains(&entry) {
            self.passwords.push(entry);
        }
    }

    /// Removes every entry that accepts `password`, plaintext or hashed.
    pub fn remove_password_matching(&mut self, password: &str) {
        self.passwords.retain(|entry| !entry.matches(password));
    }

    /// Removes the hashed entry with exactly this digest.
    pub fn remove_digest(&mut self, digest: &str) {
        self.passwords
            .retain(|entry| !(entry.kind == PasswordKind::Hashed && entry.value == digest));
    }

    /// True if any stored entry accepts `password`.
    pub fn check_password(&self, password: &str) -> bool {
        self.passwords.iter().any(|entry| entry.matches(password))
    }

    pub fn reset_keys(&mut self) {
        self.included_keys.clear();
        self.included_read_keys.clear();
        self.included_write_keys.clear();
    }

    pub fn reset_channels(&mut self) {
        self.included_channels.clear();
        self.excluded_channels.clear();
    }

    /// Returns the user to the state of a freshly created one.
    pub fn reset(&mut self) {
        let username = std::mem::take(&mut self.username);
        *self = AclUser::new(username);
    }
}
