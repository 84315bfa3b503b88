//! Password hashing.
//!
//! Passwords are hashed with Argon2id and a freshly generated per-user salt;
//! the salt travels inside the PHC string. Verification goes through
//! [`argon2::PasswordVerifier`], whose comparison is constant-time - raw hash
//! bytes are never compared with `==` anywhere in this codebase.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur while hashing or verifying a password.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password hashing failed.
    #[error("password hashing error")]
    Hash,

    /// The supplied password does not match the stored hash.
    #[error("invalid credentials")]
    Mismatch,
}

/// Hash a password using Argon2id with a fresh random salt.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a stored PHC hash string.
///
/// # Errors
///
/// Returns [`PasswordError::Mismatch`] if the password does not match or the
/// stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::Mismatch)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::Mismatch)
}
