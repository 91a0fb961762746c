// src/core/acl/engine.rs

//! `AclEngine` ties the credential store and the connection registry together
//! behind a single read/write lock.

use super::enforcer::{Invocation, authorize};
use super::error::AclError;
use super::registry::{ConnectionId, ConnectionRegistry};
use super::rules::{RuleOptions, apply_rules, validate_username};
use super::store::CredentialStore;
use super::user::{AclUser, DEFAULT_USERNAME};
use crate::config::AclConfig;
use parking_lot::RwLock;
use tracing::{debug, info};

#[derive(Debug)]
struct AclState {
    store: CredentialStore,
    registry: ConnectionRegistry,
}

/// The outcome of `delete_users`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeletedUsers {
    pub count: usize,
    /// Connections that were bound to a deleted user, with that user's name.
    pub revoked: Vec<(ConnectionId, String)>,
}

/// The ACL engine. Evaluation and introspection take the read lock; every
/// mutation of users or bindings takes the write lock.
#[derive(Debug)]
pub struct AclEngine {
    config: AclConfig,
    options: RuleOptions,
    state: RwLock<AclState>,
}

impl AclEngine {
    /// Builds the engine with a `default` user configured from `acl.default_user`.
    pub fn new(config: &AclConfig) -> Result<Self, AclError> {
        let options = RuleOptions {
            strict: config.strict_rules,
            password_hash: config.password_hash,
        };
        let default_user = Self::build_default_user(config, &options)?;
        Ok(Self {
            config: config.clone(),
            options,
            state: RwLock::new(AclState {
                store: CredentialStore::new(default_user),
                registry: ConnectionRegistry::new(),
            }),
        })
    }

    fn build_default_user(config: &AclConfig, options: &RuleOptions) -> Result<AclUser, AclError> {
        apply_rules(&AclUser::new(DEFAULT_USERNAME), &config.default_user, options)
    }

    /// True when commands must be checked against the bound user.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &AclConfig {
        &self.config
    }

    pub fn rule_options(&self) -> &RuleOptions {
        &self.options
    }

    // --- Credential store ---

    /// Creates the user if needed, then applies `rules` in order. The update
    /// is all-or-nothing.
    pub fn set_user<S: AsRef<str>>(&self, username: &str, rules: &[S]) -> Result<(), AclError> {
        validate_username(username)?;
        let mut state = self.state.write();
        let updated = match state.store.get(username) {
            Some(existing) => apply_rules(existing, rules, &self.options)?,
            None => apply_rules(&AclUser::new(username), rules, &self.options)?,
        };
        state.store.upsert(updated);
        Ok(())
    }

    /// Deletes one user and revokes its connections in the same critical section.
    pub fn delete_user(&self, username: &str) -> Result<Vec<ConnectionId>, AclError> {
        if username == DEFAULT_USERNAME {
            return Err(AclError::DefaultUserImmutable);
        }
        let mut state = self.state.write();
        if state.store.remove(username).is_none() {
            return Err(AclError::UserNotFound(username.to_string()));
        }
        Ok(state.registry.purge_user(username))
    }

    /// Deletes every named user that exists. Fails without deleting anything
    /// if `default` is among them.
    pub fn delete_users<S: AsRef<str>>(&self, usernames: &[S]) -> Result<DeletedUsers, AclError> {
        if usernames.iter().any(|u| u.as_ref() == DEFAULT_USERNAME) {
            return Err(AclError::DefaultUserImmutable);
        }
        let mut state = self.state.write();
        let mut outcome = DeletedUsers::default();
        for username in usernames {
            let username = username.as_ref();
            if state.store.remove(username).is_some() {
                outcome.count += 1;
                outcome.revoked.extend(
                    state
                        .registry
                        .purge_user(username)
                        .into_iter()
                        .map(|conn| (conn, username.to_string())),
                );
            }
        }
        Ok(outcome)
    }

    pub fn get_user(&self, username: &str) -> Option<AclUser> {
        self.state.read().store.get(username).cloned()
    }

    /// Usernames in insertion order.
    pub fn usernames(&self) -> Vec<String> {
        self.state.read().store.usernames()
    }

    /// A snapshot of every user, in insertion order.
    pub fn users(&self) -> Vec<AclUser> {
        self.state.read().store.iter().cloned().collect()
    }

    /// Replaces the whole user set, as `ACL LOAD` does. A `default` user is
    /// created from the configuration when `users` lacks one. Connections
    /// bound to users that no longer exist are revoked and returned.
    pub fn replace_users(
        &self,
        users: Vec<AclUser>,
    ) -> Result<Vec<(ConnectionId, String)>, AclError> {
        let mut replacement = match users.iter().find(|u| u.is_default()) {
            Some(default_user) => CredentialStore::new(default_user.clone()),
            None => CredentialStore::new(Self::build_default_user(&self.config, &self.options)?),
        };
        for user in users.into_iter().filter(|u| !u.is_default()) {
            replacement.upsert(user);
        }

        let mut state = self.state.write();
        state.store = replacement;
        let AclState { store, registry } = &mut *state;
        let revoked = registry.revoke_missing(|username| store.contains(username));
        info!(
            "ACL users replaced: {} users, {} connections revoked.",
            store.len(),
            revoked.len()
        );
        Ok(revoked)
    }

    // --- Connection registry ---

    pub fn register_connection(&self, conn: ConnectionId) {
        self.state.write().registry.register(conn);
    }

    pub fn unregister_connection(&self, conn: ConnectionId) {
        self.state.write().registry.unbind(conn);
    }

    /// The username bound to `conn`.
    pub fn binding_of(&self, conn: ConnectionId) -> Result<String, AclError> {
        self.state
            .read()
            .registry
            .binding_of(conn)
            .map(str::to_string)
    }

    /// Number of live connections currently bound to `username`.
    pub fn connections_bound_to(&self, username: &str) -> usize {
        self.state.read().registry.count_bound_to(username)
    }

    // --- Authentication and authorization ---

    /// Verifies the credential and binds `conn` to the user. An omitted
    /// username means `default`.
    ///
    /// Lookup, password check and binding happen under one write lock.
    pub fn authenticate(
        &self,
        conn: ConnectionId,
        username: Option<&str>,
        password: &str,
    ) -> Result<String, AclError> {
        let username = username.unwrap_or(DEFAULT_USERNAME);
        let mut state = self.state.write();
        if state.registry.is_revoked(conn) {
            return Err(AclError::ConnectionRevoked(conn));
        }
        let user = state
            .store
            .get(username)
            .ok_or_else(|| AclError::UserNotFound(username.to_string()))?;
        if !user.enabled {
            return Err(AclError::UserDisabled(username.to_string()));
        }
        if !user.check_password(password) {
            return Err(AclError::InvalidCredential);
        }
        state.registry.bind(conn, username);
        debug!("Connection {} authenticated as '{}'.", conn, username);
        Ok(username.to_string())
    }

    /// Checks whether the user bound to `conn` may run `invocation`.
    pub fn authorize(&self, conn: ConnectionId, invocation: &Invocation<'_>) -> Result<(), AclError> {
        let state = self.state.read();
        let username = state.registry.binding_of(conn)?;
        let user = state
            .store
            .get(username)
            .ok_or_else(|| AclError::UserNotFound(username.to_string()))?;
        authorize(user, invocation).into_result(username, invocation.command)
    }
}
