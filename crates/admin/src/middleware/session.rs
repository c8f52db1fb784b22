//! Session cookie handling.
//!
//! The cookie carries the raw session token; everything else about the
//! session lives in the store.

use axum::http::{HeaderMap, header};
use cookie::time::Duration;
use cookie::{Cookie, SameSite};

use crate::services::session::SESSION_TTL_SECONDS;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "admin_session";

/// Extract the session token from raw `Cookie` header text.
///
/// Returns `None` when the cookie is absent or empty. Malformed pairs are
/// skipped.
#[must_use]
pub fn session_token_from_cookie_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Extract the session token from request headers.
///
/// Multiple `Cookie` headers are searched in order.
#[must_use]
pub fn session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_token_from_cookie_header)
}

/// Build the cookie that establishes a session.
#[must_use]
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token.to_owned()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::seconds(SESSION_TTL_SECONDS))
        .build()
}

/// Build the cookie that clears the session.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
