//! Credential hashing and session-token helpers
//!
//! Passwords are stored as SHA-256 of salt + password with a per-user random
//! salt; session tokens are opaque random hex strings handed to clients as
//! bearer tokens. This module contains only pure functions — database access
//! for users and sessions lives in the API crate.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a generated salt, in hex characters
const SALT_LEN: usize = 32;

/// Length of a generated session token, in hex characters
const TOKEN_LEN: usize = 64;

/// Generate a random per-user password salt
pub fn generate_salt() -> String {
    random_hex(SALT_LEN)
}

/// Hash a password with its salt
///
/// Deterministic: same (password, salt) pair always yields the same hash.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a password attempt against the stored salt and hash
pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

/// Generate an opaque session token
pub fn generate_session_token() -> String {
    random_hex(TOKEN_LEN)
}

/// Compute a session expiry timestamp `ttl_seconds` from now, as RFC 3339
pub fn session_expiry(ttl_seconds: i64) -> String {
    (Utc::now() + Duration::seconds(ttl_seconds)).to_rfc3339()
}

/// Whether an RFC 3339 expiry timestamp lies in the past
///
/// Unparseable timestamps count as expired so a corrupted row can never
/// grant access.
pub fn session_expired(expires_at: &str) -> bool {
    match DateTime::parse_from_rfc3339(expires_at) {
        Ok(expiry) => expiry.with_timezone(&Utc) <= Utc::now(),
        Err(_) => true,
    }
}

fn random_hex(len: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip() {
        let salt = generate_salt();
        let hash = hash_password("hunter2", &salt);

        assert!(verify_password("hunter2", &salt, &hash));
        assert!(!verify_password("hunter3", &salt, &hash));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let hash1 = hash_password("secret", "abcd");
        let hash2 = hash_password("secret", "abcd");
        assert_eq!(hash1, hash2);

        // SHA-256 renders as 64 hex characters
        assert_eq!(hash1.len(), 64);
        assert!(hash1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salt_changes_hash() {
        let hash1 = hash_password("secret", "salt-one");
        let hash2 = hash_password("secret", "salt-two");
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_session_token_shape() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn test_session_expiry_in_future() {
        let expires_at = session_expiry(3600);
        assert!(!session_expired(&expires_at));
    }

    #[test]
    fn test_expired_session_detected() {
        let expires_at = (Utc::now() - Duration::seconds(10)).to_rfc3339();
        assert!(session_expired(&expires_at));
    }

    #[test]
    fn test_garbage_expiry_counts_as_expired() {
        assert!(session_expired("not-a-timestamp"));
    }
}
