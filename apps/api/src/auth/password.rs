//! Credential checks: bcrypt hashing and registration input rules.

use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Hashes off the async runtime; bcrypt is deliberately slow.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .context("password hashing task panicked")?
        .context("failed to hash password")?;
    Ok(hashed)
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task panicked")?
        // A malformed stored hash is treated as a mismatch
        .unwrap_or(false);
    Ok(matches)
}
