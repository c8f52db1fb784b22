//! Session-related types for admin authentication.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hactor_core::AdminId;

/// The authenticated admin behind a valid session.
///
/// Carries the identity only, never credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub admin_id: AdminId,
    /// Admin's login name.
    pub username: String,
}

/// A session row to persist.
///
/// Only the hash of the client token is stored.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub admin_id: AdminId,
    pub expires_at: DateTime<Utc>,
}

/// A stored session joined with its owning admin.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub token_hash: String,
    pub admin_id: AdminId,
    pub expires_at: DateTime<Utc>,
    /// `None` when the owning admin no longer exists.
    pub owner: Option<SessionOwner>,
}

/// The owning admin as seen from a session lookup.
#[derive(Debug, Clone)]
pub struct SessionOwner {
    pub username: String,
    pub is_active: bool,
}

impl SessionRecord {
    /// Resolve the record into an identity if it is still usable at `now`.
    ///
    /// A session is valid iff it has not expired and its owner exists and is
    /// active.
    #[must_use]
    pub fn authenticate(&self, now: DateTime<Utc>) -> Option<CurrentAdmin> {
        if self.expires_at <= now {
            return None;
        }
        let owner = self.owner.as_ref().filter(|owner| owner.is_active)?;
        Some(CurrentAdmin {
            admin_id: self.admin_id,
            username: owner.username.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(expires_in: Duration, owner: Option<SessionOwner>) -> SessionRecord {
        SessionRecord {
            token_hash: "abc".to_string(),
            admin_id: AdminId::generate(),
            expires_at: Utc::now() + expires_in,
            owner,
        }
    }

    fn owner(is_active: bool) -> Option<SessionOwner> {
        Some(SessionOwner {
            username: "root".to_string(),
            is_active,
        })
    }

    #[test]
    fn test_authenticate_valid() {
        let record = record(Duration::minutes(10), owner(true));
        let admin = record.authenticate(Utc::now());
        assert_eq!(admin.map(|a| a.username), Some("root".to_string()));
    }

    #[test]
    fn test_authenticate_expired() {
        let record = record(Duration::seconds(-1), owner(true));
        assert!(record.authenticate(Utc::now()).is_none());
    }

    #[test]
    fn test_authenticate_expiry_boundary_is_invalid() {
        let record = record(Duration::minutes(10), owner(true));
        assert!(record.authenticate(record.expires_at).is_none());
    }

    #[test]
    fn test_authenticate_inactive_or_missing_owner() {
        assert!(
            record(Duration::minutes(10), owner(false))
                .authenticate(Utc::now())
                .is_none()
        );
        assert!(
            record(Duration::minutes(10), None)
                .authenticate(Utc::now())
                .is_none()
        );
    }
}
