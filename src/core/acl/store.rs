// src/core/acl/store.rs

//! The credential store: configured users, keyed by name, in insertion order.

use super::user::{AclUser, DEFAULT_USERNAME};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct CredentialStore {
    users: IndexMap<String, AclUser>,
}

impl CredentialStore {
    /// Creates a store holding only the given `default` user.
    pub fn new(default_user: AclUser) -> Self {
        let mut users = IndexMap::new();
        users.insert(DEFAULT_USERNAME.to_string(), default_user);
        Self { users }
    }

    pub fn get(&self, username: &str) -> Option<&AclUser> {
        self.users.get(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Inserts or replaces a user, keeping the position of an existing entry.
    pub fn upsert(&mut self, user: AclUser) {
        self.users.insert(user.username.clone(), user);
    }

    /// Removes a user, preserving the order of the remaining ones.
    pub fn remove(&mut self, username: &str) -> Option<AclUser> {
        self.users.shift_remove(username)
    }

    pub fn usernames(&self) -> Vec<String> {
        self.users.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AclUser> {
        self.users.values()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
