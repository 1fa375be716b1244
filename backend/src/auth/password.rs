//! Password hashing using argon2
//!
//! Argon2 is CPU-heavy, so the async entry points run on the blocking pool.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub struct PasswordService;

impl PasswordService {
    fn hash_blocking(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    fn verify_blocking(password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| anyhow!("Invalid hash format: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    pub async fn hash(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash_blocking(&password))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?
    }

    pub async fn verify(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify_blocking(&password, &hash))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?
    }
}
