//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors from login and account creation.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email did not parse.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] estore_core::EmailError),

    /// Unknown email or wrong password. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password does not meet the minimum requirements.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
