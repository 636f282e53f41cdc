use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::domain::ports::CredentialHasher;
use crate::error::AppError;

#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                error!("Password hashing failed: {}", e);
                AppError::Internal
            })
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        // A stored value that is not a PHC string never matches.
        match PasswordHash::new(hash) {
            Ok(parsed) => self.argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_and_hides_plaintext() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("pw1").unwrap();

        assert_ne!(hash, "pw1");
        assert!(hash.starts_with("$argon2"));
        assert!(hasher.verify("pw1", &hash));
        assert!(!hasher.verify("pw2", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        let hasher = Argon2Hasher::new();
        assert!(!hasher.verify("admin", "admin"));
    }
}
