// src/core/acl/registry.rs

//! The connection registry: which identity each live connection is bound to.

use super::error::AclError;
use super::user::DEFAULT_USERNAME;
use std::collections::HashMap;

/// The stable handle of a client connection (its session id).
pub type ConnectionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    Bound(String),
    /// The bound user was deleted. The record stays until the connection
    /// closes so no later command can run under the old identity.
    Revoked(String),
}

#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    records: HashMap<ConnectionId, Binding>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a freshly accepted connection, bound to `default`.
    pub fn register(&mut self, conn: ConnectionId) {
        self.records
            .insert(conn, Binding::Bound(DEFAULT_USERNAME.to_string()));
    }

    /// Binds (or rebinds) a connection to `username`.
    pub fn bind(&mut self, conn: ConnectionId, username: &str) {
        self.records
            .insert(conn, Binding::Bound(username.to_string()));
    }

    /// The username bound to `conn`. Handles that were never registered are
    /// treated as `default`.
    pub fn binding_of(&self, conn: ConnectionId) -> Result<&str, AclError> {
        match self.records.get(&conn) {
            Some(Binding::Bound(username)) => Ok(username),
            Some(Binding::Revoked(_)) => Err(AclError::ConnectionRevoked(conn)),
            None => Ok(DEFAULT_USERNAME),
        }
    }

    pub fn is_revoked(&self, conn: ConnectionId) -> bool {
        matches!(self.records.get(&conn), Some(Binding::Revoked(_)))
    }

    /// Drops the record of a closed connection.
    pub fn unbind(&mut self, conn: ConnectionId) -> bool {
        self.records.remove(&conn).is_some()
    }

    /// Revokes every connection bound to `username` and returns their handles.
    /// Already revoked records are not returned again.
    pub fn purge_user(&mut self, username: &str) -> Vec<ConnectionId> {
        self.revoke_where(|bound| bound == username)
            .into_iter()
            .map(|(conn, _)| conn)
            .collect()
    }

    /// Revokes bindings whose user no longer exists according to `exists`.
    pub fn revoke_missing<F>(&mut self, exists: F) -> Vec<(ConnectionId, String)>
    where
        F: Fn(&str) -> bool,
    {
        self.revoke_where(|bound| !exists(bound))
    }

    fn revoke_where<F>(&mut self, predicate: F) -> Vec<(ConnectionId, String)>
    where
        F: Fn(&str) -> bool,
    {
        let mut revoked = Vec::new();
        for (conn, binding) in self.records.iter_mut() {
            if let Binding::Bound(username) = binding
                && predicate(username)
            {
                let username = std::mem::take(username);
                revoked.push((*conn, username.clone()));
                *binding = Binding::Revoked(username);
            }
        }
        revoked.sort_unstable_by_key(|(conn, _)| *conn);
        revoked
    }

    /// Number of live (non-revoked) connections bound to `username`.
    pub fn count_bound_to(&self, username: &str) -> usize {
        self.records
            .values()
            .filter(|binding| matches!(binding, Binding::Bound(u) if u == username))
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
