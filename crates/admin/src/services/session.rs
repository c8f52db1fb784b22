//! Admin session store.
//!
//! Tokens are 32 random bytes, base64url-encoded without padding. Only the
//! hex SHA-256 of a token is persisted. Expiry is absolute; expired or
//! orphaned records are deleted when they are next presented.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use hactor_core::AdminId;

use crate::db::{RepositoryError, SessionRepository};
use crate::models::{CurrentAdmin, NewSession, SessionRecord};

/// Session lifetime in seconds.
pub const SESSION_TTL_SECONDS: i64 = 60 * 60;

/// A freshly issued session.
pub struct IssuedSession {
    /// Raw token for the cookie. Never logged or stored.
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for IssuedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedSession")
            .field("token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Generate a new random session token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a token for storage and lookup.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Session operations over a session repository.
pub struct SessionService<'a, R: ?Sized> {
    repo: &'a R,
}

impl<'a, R> SessionService<'a, R>
where
    R: SessionRepository + ?Sized,
{
    #[must_use]
    pub const fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Issue a session for an admin, valid for [`SESSION_TTL_SECONDS`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the session cannot be stored.
    pub async fn create(&self, admin_id: AdminId) -> Result<IssuedSession, RepositoryError> {
        let token = generate_token();
        let expires_at = Utc::now() + Duration::seconds(SESSION_TTL_SECONDS);

        self.repo
            .create_session(NewSession {
                token_hash: hash_token(&token),
                admin_id,
                expires_at,
            })
            .await?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Look up the stored record for a token, valid or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    pub async fn lookup(&self, token: &str) -> Result<Option<SessionRecord>, RepositoryError> {
        self.repo.find_session(&hash_token(token)).await
    }

    /// Delete a session. Unknown tokens are not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the delete fails.
    pub async fn invalidate(&self, token: &str) -> Result<(), RepositoryError> {
        self.repo.delete_session(&hash_token(token)).await?;
        Ok(())
    }

    /// Resolve a token to the admin it authenticates.
    ///
    /// Expired sessions and sessions whose admin is gone or inactive resolve
    /// to `None` and are deleted on the way out.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the lookup fails.
    pub async fn resolve(&self, token: &str) -> Result<Option<CurrentAdmin>, RepositoryError> {
        let Some(record) = self.lookup(token).await? else {
            return Ok(None);
        };

        if let Some(admin) = record.authenticate(Utc::now()) {
            return Ok(Some(admin));
        }

        tracing::info!(admin_id = %record.admin_id, "Evicting stale admin session");
        if let Err(e) = self.repo.delete_session(&record.token_hash).await {
            tracing::warn!(error = %e, "Failed to evict stale admin session");
        }
        Ok(None)
    }
}
