//! Argon2id password hashing.
//!
//! Both functions are CPU bound; async callers run them on the blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::LazyLock;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash a password into a PHC string suitable for storage.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a candidate password against a stored hash.
///
/// # Returns
/// * `Ok(true)` if the password matches
/// * `Ok(false)` if it does not
/// * `Err(PasswordError)` if the stored hash cannot be parsed
pub fn verify_password(candidate: &str, password_hash: &str) -> Result<bool, PasswordError> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .is_ok())
}

/// Hash checked when a login names no account, so that path costs the same
/// as a wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dayplanner-no-such-account").ok());

/// Run a full verification against [`DUMMY_HASH`] and discard the result.
pub fn verify_dummy(candidate: &str) {
    match DUMMY_HASH.as_deref() {
        Some(hash) => {
            let _ = verify_password(candidate, hash);
        }
        None => {
            let _ = hash_password(candidate);
        }
    }
}
