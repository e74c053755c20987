//! Argon2 password hashing
//!
//! Hashing and verification are CPU-bound and run on the blocking pool.

use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::utils::{AppError, AppResult};

/// Verified against when the username is unknown, so both login failures cost one verification
static DUMMY_HASH: LazyLock<String> = LazyLock::new(|| hash_blocking("unknown-user-placeholder").unwrap_or_default());

fn hash_blocking(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

fn verify_blocking(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::internal(format!("Stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

async fn run_blocking<T, F>(task: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        tracing::error!("spawn_blocking join error: {e}");
        AppError::internal("Password task failed")
    })?
}

/// Hash a password into a PHC string
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_owned();
    run_blocking(move || hash_blocking(&password)).await
}

/// Verify a password against a stored PHC string
///
/// A malformed stored hash is an internal error, a mismatch is `Ok(false)`.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_owned();
    let stored_hash = stored_hash.to_owned();
    run_blocking(move || verify_blocking(&password, &stored_hash)).await
}

/// Verify a login attempt; `None` (unknown user) still runs one verification and yields `false`
pub async fn verify_login(password: &str, stored_hash: Option<&str>) -> AppResult<bool> {
    match stored_hash {
        Some(hash) => verify_password(password, hash).await,
        None => {
            let password = password.to_owned();
            run_blocking(move || {
                let _ = verify_blocking(&password, &DUMMY_HASH);
                Ok(false)
            })
            .await
        }
    }
}
