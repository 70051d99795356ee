//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
}

/// Hash verified when the login is unknown, so that path costs one Argon2 run
/// like a wrong password does.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("assetvault-dummy-password").ok());

pub struct PasswordService;

impl PasswordService {
    /// Argon2id PHC string with a fresh random salt.
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Burns one verification against a fixed hash. Always reports failure.
    pub fn verify_dummy(password: &str) -> bool {
        if let Some(hash) = DUMMY_HASH.as_deref() {
            let _ = Self::verify(password, hash);
        }
        false
    }
}
