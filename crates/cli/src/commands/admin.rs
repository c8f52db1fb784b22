//! Admin account management commands.
//!
//! Admins are never created through the web API; this is the only
//! provisioning path.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin, reading the password from stdin
//! hactor-cli admin create -u root < password.txt
//!
//! # Deactivate an admin and revoke its sessions
//! hactor-cli admin deactivate -u root
//! ```
//!
//! # Environment Variables
//!
//! - `HACTOR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)

use hactor_admin::db::{PgStore, create_pool};
use hactor_admin::services::{AuthError, AuthService};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{DATABASE_URL_VAR, database_url};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// No password was supplied on stdin.
    #[error("No password provided on stdin")]
    EmptyPassword,

    /// Reading stdin failed.
    #[error("Failed to read password: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected by the auth service.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin account.
///
/// The password is the first line of stdin, without its line terminator.
///
/// # Errors
///
/// Returns `AdminError::Auth` if the username is taken or the password is
/// too weak.
pub async fn create(username: &str) -> Result<(), AdminError> {
    let password = read_password().await?;
    let store = connect().await?;

    tracing::info!("Creating admin: {}", username.trim());
    let admin = AuthService::new(&store).create_admin(username, &password).await?;

    tracing::info!(
        "Admin created successfully! ID: {}, Username: {}",
        admin.id,
        admin.username
    );

    store.pool().close().await;
    Ok(())
}

/// Deactivate an admin and revoke every session it holds.
///
/// # Errors
///
/// Returns `AdminError::Auth` if the username is unknown.
pub async fn deactivate(username: &str) -> Result<(), AdminError> {
    let store = connect().await?;

    let revoked = AuthService::new(&store).deactivate_admin(username).await?;
    tracing::info!(
        "Admin {} deactivated, {} session(s) revoked",
        username.trim(),
        revoked
    );

    store.pool().close().await;
    Ok(())
}

async fn connect() -> Result<PgStore, AdminError> {
    let database_url = database_url().ok_or(AdminError::MissingEnvVar(DATABASE_URL_VAR))?;

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    Ok(PgStore::new(pool))
}

async fn read_password() -> Result<String, AdminError> {
    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;

    let password = strip_line_ending(&line);
    if password.is_empty() {
        return Err(AdminError::EmptyPassword);
    }
    Ok(password.to_string())
}

/// Drop a trailing `\n` or `\r\n`; every other character is kept verbatim.
fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map_or(line, |rest| rest.strip_suffix('\r').unwrap_or(rest))
}
