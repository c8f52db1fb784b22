//! Login, logout and session-check handlers.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::{
    RequireAdminSession, clear_session_cookie, session::session_token_from_headers, session_cookie,
};
use crate::services::{AuthError, AuthService, SessionService};
use crate::state::AppState;

/// `POST /api/admin/login` body.
///
/// A body that is not valid JSON is treated as empty.
#[derive(Default, Deserialize)]
struct LoginRequest {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

/// Exchange credentials for a session cookie.
///
/// POST /api/admin/login
pub async fn login(State(state): State<AppState>, body: Bytes) -> Response {
    let mut response = match authenticate(&state, &body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    };
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

async fn authenticate(state: &AppState, body: &[u8]) -> Result<Response, AppError> {
    let payload: LoginRequest = serde_json::from_slice(body).unwrap_or_default();
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let admin = match AuthService::new(state.store())
        .login_with_password(&username, &password)
        .await
    {
        Ok(admin) => admin,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %username.trim(), "Failed admin login");
            return Err(AuthError::InvalidCredentials.into());
        }
        Err(e) => return Err(e.into()),
    };

    let issued = SessionService::new(state.store())
        .create(admin.admin_id)
        .await?;

    tracing::info!(admin_id = %admin.admin_id, username = %admin.username, "Admin logged in");

    let cookie = session_cookie(&issued.token, state.config().is_secure());
    Ok((
        AppendHeaders([(header::SET_COOKIE, cookie.to_string())]),
        Json(json!({ "ok": true })),
    )
        .into_response())
}

/// Drop the session and clear the cookie. Always succeeds.
///
/// POST /api/admin/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session_token_from_headers(&headers) {
        if let Err(e) = SessionService::new(state.store()).invalidate(&token).await {
            tracing::warn!(error = %e, "Failed to delete admin session on logout");
        }
    }

    let cookie = clear_session_cookie(state.config().is_secure());
    (
        AppendHeaders([
            (header::SET_COOKIE, cookie.to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ]),
        Json(json!({ "ok": true })),
    )
}

/// Report the admin behind the current session.
///
/// GET /api/admin/session
pub async fn session(RequireAdminSession(admin): RequireAdminSession) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(json!({ "ok": true, "username": admin.username })),
    )
}
