//! HTTP middleware and extractors.
//!
//! # Guard order for mutating admin endpoints
//!
//! 1. `origin::require_same_origin` (route layer on `/api/admin`)
//! 2. `auth::RequireAdminSession` (extractor in each handler)
//!
//! `gatekeeper::console_gatekeeper` sits on the whole router and only acts on
//! `/admin/*` page navigation.

pub mod auth;
pub mod gatekeeper;
pub mod origin;
pub mod session;

pub use auth::{RequireAdminSession, SessionRejection};
pub use gatekeeper::console_gatekeeper;
pub use origin::require_same_origin;
pub use session::{
    SESSION_COOKIE_NAME, clear_session_cookie, session_cookie, session_token_from_cookie_header,
};
