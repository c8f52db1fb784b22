//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during admin authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username or password missing from the login request.
    #[error("Missing credentials")]
    MissingCredentials,

    /// Unknown admin, inactive admin, malformed hash, or wrong password.
    ///
    /// Deliberately indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Admin not found (management operations only).
    #[error("admin not found")]
    AdminNotFound,

    /// Username already taken.
    #[error("admin already exists")]
    AdminAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
