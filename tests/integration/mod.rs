// tests/integration/mod.rs

//! Integration tests for KeyGate
//!
//! These tests drive commands through the router or over real sockets,
//! verifying ACL enforcement, state changes and connection lifecycle.

pub mod acl_test;
pub mod auth_test;
pub mod connection_test;
pub mod keyspace_test;
