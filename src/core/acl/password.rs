// src/core/acl/password.rs

//! Password hashing and verification for ACL credentials.

use super::error::AclError;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The algorithm used to hash passwords added with `>password`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordHashAlgorithm {
    /// Hex-encoded SHA-256, the format `ACL LIST` and ACL files exchange.
    #[default]
    Sha256,
    /// An Argon2id PHC string.
    Argon2,
}

/// Returns the lowercase hex SHA-256 digest of `password`.
pub fn sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Hashes a password with the configured algorithm.
pub fn hash_password(password: &str, algorithm: PasswordHashAlgorithm) -> Result<String, AclError> {
    match algorithm {
        PasswordHashAlgorithm::Sha256 => Ok(sha256_hex(password)),
        PasswordHashAlgorithm::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AclError::invalid_rule(">", format!("failed to hash password: {e}")))
        }
    }
}

/// Normalizes a digest supplied by a `#digest` or `!digest` rule.
///
/// Accepts a 64-character hex SHA-256 digest (returned lowercased) or an
/// Argon2 PHC string (returned unchanged).
pub fn normalize_digest(digest: &str) -> Option<String> {
    if digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(digest.to_ascii_lowercase());
    }
    if digest.starts_with("$argon2") && PasswordHash::new(digest).is_ok() {
        return Some(digest.to_string());
    }
    None
}

/// Checks `password` against a stored digest of either supported format.
pub fn verify_digest(password: &str, digest: &str) -> bool {
    if digest.starts_with('$') {
        return match PasswordHash::new(digest) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        };
    }
    constant_time_eq(sha256_hex(password).as_bytes(), digest.as_bytes())
}

/// Compares two byte strings without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
