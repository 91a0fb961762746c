// tests/property/mod.rs

//! Property-based tests for KeyGate
//!
//! These tests use property-based testing to verify invariants and properties
//! that should always hold, regardless of input values.

pub mod acl_rules_test;
pub mod roundtrip_test;
