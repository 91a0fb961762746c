// src/core/acl/mod.rs

//! Access control: users, rule parsing, permission evaluation and the
//! connection-to-user bindings.

pub mod category;
pub mod enforcer;
pub mod engine;
pub mod error;
pub mod file;
pub mod password;
pub mod pattern;
pub mod registry;
pub mod rules;
pub mod serializer;
pub mod store;
pub mod user;

pub use category::{CATEGORY_INDEX, CategoryIndex};
pub use enforcer::{AclVerdict, DenyReason, Invocation, KeyAccess};
pub use engine::{AclEngine, DeletedUsers};
pub use error::AclError;
pub use password::PasswordHashAlgorithm;
pub use registry::ConnectionId;
pub use rules::{AclRule, RuleOptions};
pub use user::{AclUser, DEFAULT_USERNAME, PasswordEntry, PasswordKind};
