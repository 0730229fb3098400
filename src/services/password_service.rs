//! Password hashing and verification.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::{AppError, Result};

/// Hash a plaintext password.
pub fn hash_password(password: &str) -> Result<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a plaintext password against a stored hash.
///
/// Malformed or legacy hash values verify as `false` rather than erroring.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let password = "correct horse battery staple";
        let password_hash = hash_password(password).unwrap();
        assert!(verify_password(password, &password_hash));
        assert!(!verify_password("wrong password", &password_hash));
    }

    #[test]
    fn malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn hashing_an_already_hashed_value_does_not_crash() {
        // A historic migration re-hashed stored hashes; the operation must
        // stay well-defined even if that path is hit again.
        let first = hash_password("password123").unwrap();
        let second = hash_password(&first).unwrap();
        assert!(verify_password(&first, &second));
        assert!(!verify_password("password123", &second));
    }
}
