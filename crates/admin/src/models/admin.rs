//! Admin account domain types.
//!
//! Admins are provisioned out-of-band with the CLI; the web backend only
//! reads them.

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use hactor_core::AdminId;

/// An admin account (domain type).
///
/// `Debug` never prints the password hash.
#[derive(Debug, Clone)]
pub struct Admin {
    /// Unique admin ID.
    pub id: AdminId,
    /// Login name (unique).
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: SecretString,
    /// Inactive admins can neither log in nor keep existing sessions.
    pub is_active: bool,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for provisioning a new admin.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub password_hash: SecretString,
}
