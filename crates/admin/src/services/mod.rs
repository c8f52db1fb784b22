//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Username/password verification and admin provisioning
//! - `session` - Opaque session tokens with absolute expiry

pub mod auth;
pub mod session;

pub use auth::{AuthError, AuthService};
pub use session::{IssuedSession, SessionService};
