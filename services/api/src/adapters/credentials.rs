//! services/api/src/adapters/credentials.rs
//!
//! Argon2 implementation of the `CredentialVerifier` port.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use placement_core::ports::{CredentialVerifier, PortError, PortResult};
use tracing::error;

/// Hashes passwords into PHC strings with a fresh random salt.
#[derive(Clone, Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> PortResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!("Failed to hash password: {:?}", e);
                PortError::Unexpected("failed to hash password".to_string())
            })
    }

    fn verify(&self, digest: &str, password: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                error!("Failed to parse password hash: {:?}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_verifies_only_the_original_password() {
        let verifier = Argon2Verifier::new();
        let digest = verifier.hash("password123").expect("hashes");
        assert!(digest.starts_with("$argon2"));
        assert!(!digest.contains("password123"));
        assert!(verifier.verify(&digest, "password123"));
        assert!(!verifier.verify(&digest, "password124"));
    }

    #[test]
    fn garbage_digest_never_verifies() {
        assert!(!Argon2Verifier::new().verify("not-a-phc-string", "anything"));
    }
}
