//! Password hashing with Argon2id.

use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::error::AuthRejection;
use crate::CommerceError;

/// Shortest password accepted at sign-up, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hashes and verifies account passwords.
///
/// Hashes are PHC strings (`$argon2id$v=19$...`) carrying their own salt
/// and parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, CommerceError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CommerceError::Credentials(e.to_string()))
    }

    /// Verify a password against a stored hash. A malformed hash never
    /// verifies.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                false
            }
        }
    }

    /// Validate password strength.
    pub fn validate_password(password: &str) -> Result<(), AuthRejection> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthRejection::WeakPassword);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let hasher = PasswordHasher;
        let hash = hasher.hash("metformin500").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher.verify("metformin500", &hash));
        assert!(!hasher.verify("metformin501", &hash));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = PasswordHasher;
        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("secret1", &second));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!PasswordHasher.verify("secret1", "secret1"));
    }

    #[test]
    fn test_password_validation() {
        assert!(PasswordHasher::validate_password("abc123").is_ok());
        assert_eq!(
            PasswordHasher::validate_password("abc12"),
            Err(AuthRejection::WeakPassword)
        );
        // Counted in characters, not bytes.
        assert!(PasswordHasher::validate_password("ññññ").is_err());
    }
}
