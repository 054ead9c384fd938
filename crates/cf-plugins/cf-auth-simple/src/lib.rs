//! # cf-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`.
//! Handles password hashing for registration/reset and opaque token keys
//! for the `Authorization: Token <key>` scheme.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use cf_core::error::{AppError, Result};
use cf_core::traits::AuthProvider;

/// Token keys are 20 random bytes, hex-encoded to 40 characters.
const TOKEN_KEY_BYTES: usize = 20;

#[derive(Default)]
pub struct SimpleAuthProvider;

impl SimpleAuthProvider {
    pub fn new() -> Self {
        Self
    }
}

impl AuthProvider for SimpleAuthProvider {
    /// Hashes a password with Argon2id and a per-password random salt.
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    /// Verifies a password against a stored Argon2 hash.
    /// An unparseable hash verifies as false rather than erroring.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Generates a fresh random token key.
    fn generate_token_key(&self) -> String {
        let mut bytes = [0u8; TOKEN_KEY_BYTES];
        // getrandom only fails when the OS entropy source is unavailable.
        getrandom::getrandom(&mut bytes).expect("OS random source unavailable");
        hex::encode(bytes)
    }
}
