//! Argon2 password hashing implementation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use sentra_core::ports::{AuthError, PasswordService};

/// Argon2-based password service. Each hash gets a fresh random salt, so the
/// stored hash never equals the plaintext and two equal passwords never share
/// a hash.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_rejects_wrong_password() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("Secret1!").unwrap();

        assert_ne!(hash, "Secret1!");
        assert!(service.verify("Secret1!", &hash).unwrap());
        assert!(!service.verify("WrongPass1!", &hash).unwrap());
    }

    #[test]
    fn equal_passwords_hash_differently() {
        let service = Argon2PasswordService::new();

        let first = service.hash("Secret1!").unwrap();
        let second = service.hash("Secret1!").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn verify_against_malformed_hash_errors() {
        let service = Argon2PasswordService::new();

        let result = service.verify("Secret1!", "not-a-phc-string");

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }
}
