//! Admin authentication service.
//!
//! Username/password login against bcrypt hashes, plus the provisioning
//! operations used by the CLI. bcrypt work runs on the blocking pool.

mod error;

pub use error::AuthError;

use secrecy::{ExposeSecret, SecretString};

use crate::db::{AdminRepository, RepositoryError, SessionRepository};
use crate::models::{Admin, CurrentAdmin, NewAdmin};

/// Minimum password length for newly provisioned admins.
pub const MIN_PASSWORD_LENGTH: usize = 12;

/// Well-formed bcrypt hash at `DEFAULT_COST` that no password matches.
///
/// Verified against when the username is unknown or inactive.
const DUMMY_PASSWORD_HASH: &str = "$2b$12$QYb/WT3uYBR5e52FcLaYOuEYCL5SKFkmemNUspcjCSRvX1OX7.KQm";

/// Admin authentication service.
pub struct AuthService<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R> AuthService<'a, R>
where
    R: AdminRepository + ?Sized,
{
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Login with username and password.
    ///
    /// The username is trimmed; the password is used verbatim.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if either value is empty.
    /// Returns `AuthError::InvalidCredentials` for every other rejection.
    pub async fn login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<CurrentAdmin, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(admin) = self
            .repo
            .find_admin_by_username(username)
            .await?
            .filter(|admin| admin.is_active)
        else {
            // Same bcrypt work as a real check, so timing does not reveal usernames.
            let dummy = SecretString::from(DUMMY_PASSWORD_HASH);
            let _ = verify_password(password, &dummy).await;
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &admin.password_hash).await?;

        Ok(CurrentAdmin {
            admin_id: admin.id,
            username: admin.username,
        })
    }

    /// Provision a new admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::AdminAlreadyExists` if the username is taken.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<Admin, AuthError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        validate_password(password)?;

        let password_hash = hash_password(password, bcrypt::DEFAULT_COST).await?;

        self.repo
            .create_admin(NewAdmin {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AdminAlreadyExists,
                other => AuthError::Repository(other),
            })
    }
}

impl<R> AuthService<'_, R>
where
    R: AdminRepository + SessionRepository + ?Sized,
{
    /// Deactivate an admin and revoke all of its sessions.
    ///
    /// Returns the number of revoked sessions.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AdminNotFound` if the username is unknown.
    pub async fn deactivate_admin(&self, username: &str) -> Result<u64, AuthError> {
        let admin = self
            .repo
            .set_admin_active(username.trim(), false)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::AdminNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(self.repo.delete_sessions_for_admin(admin.id).await?)
    }
}

/// Validate a new password.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password with bcrypt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub async fn hash_password(password: &str, cost: u32) -> Result<SecretString, AuthError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|_| AuthError::PasswordHash)?
        .map_err(|_| AuthError::PasswordHash)?;

    Ok(SecretString::from(hash))
}

/// Verify a password against a stored bcrypt hash.
///
/// Malformed hashes fail closed.
async fn verify_password(password: &str, hash: &SecretString) -> Result<(), AuthError> {
    let password = password.to_owned();
    let hash = hash.expose_secret().to_owned();

    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|_| AuthError::PasswordHash)?;

    match verified {
        Ok(true) => Ok(()),
        Ok(false) => Err(AuthError::InvalidCredentials),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be checked");
            Err(AuthError::InvalidCredentials)
        }
    }
}
