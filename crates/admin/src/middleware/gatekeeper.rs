//! Redirect unauthenticated console navigation to the login page.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::auth::{SessionRejection, resolve_admin};
use super::session::clear_session_cookie;
use crate::state::AppState;

/// Login page path.
pub const LOGIN_PATH: &str = "/admin";

/// Whether a path belongs to the session-gated console.
///
/// The login page itself (`/admin`, `/admin/`) is public.
#[must_use]
pub fn is_gated_console_path(path: &str) -> bool {
    path.strip_prefix("/admin/")
        .is_some_and(|rest| !rest.is_empty())
}

/// Gate `/admin/*` behind a valid session.
///
/// Any failure to resolve the session, including store errors, redirects.
/// A stale cookie is cleared on the way out.
pub async fn console_gatekeeper(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !is_gated_console_path(request.uri().path()) {
        return next.run(request).await;
    }

    match resolve_admin(request.headers(), &state).await {
        Ok(Some(_)) => next.run(request).await,
        Err(SessionRejection::InvalidSession { secure }) => (
            [(header::SET_COOKIE, clear_session_cookie(secure).to_string())],
            Redirect::to(LOGIN_PATH),
        )
            .into_response(),
        Ok(None) | Err(_) => Redirect::to(LOGIN_PATH).into_response(),
    }
}
