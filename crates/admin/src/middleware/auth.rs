//! Session guard for admin endpoints.
//!
//! Provides an extractor that resolves the `admin_session` cookie into the
//! authenticated admin, or rejects the request with 401.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{AppendHeaders, IntoResponse, Response},
};
use serde_json::json;

use super::session::{clear_session_cookie, session_token_from_headers};
use crate::db::RepositoryError;
use crate::error::{AppError, set_sentry_user};
use crate::models::CurrentAdmin;
use crate::services::SessionService;
use crate::state::AppState;

/// Extractor that requires a valid admin session.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminSession(admin): RequireAdminSession,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdminSession(pub CurrentAdmin);

/// Error returned when a request has no usable admin session.
#[derive(Debug)]
pub enum SessionRejection {
    /// No session cookie on the request.
    MissingCookie,
    /// A cookie was presented but does not resolve to an active admin.
    InvalidSession {
        /// Whether the clearing cookie must be `Secure`.
        secure: bool,
    },
    /// The session store could not be queried.
    Store(RepositoryError),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "ok": false, "message": "Unauthorized" }));
        match self {
            Self::MissingCookie => (
                StatusCode::UNAUTHORIZED,
                [(header::CACHE_CONTROL, "no-store")],
                body,
            )
                .into_response(),
            Self::InvalidSession { secure } => (
                StatusCode::UNAUTHORIZED,
                AppendHeaders([
                    (header::SET_COOKIE, clear_session_cookie(secure).to_string()),
                    (header::CACHE_CONTROL, "no-store".to_string()),
                ]),
                body,
            )
                .into_response(),
            Self::Store(e) => AppError::Database(e).into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdminSession {
    type Rejection = SessionRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = resolve_admin(&parts.headers, state)
            .await?
            .ok_or(SessionRejection::MissingCookie)?;

        set_sentry_user(&admin);
        Ok(Self(admin))
    }
}

/// Resolve the session cookie on a request.
///
/// Returns `Ok(None)` when no cookie is present. A cookie that does not
/// resolve is an `InvalidSession` rejection.
///
/// # Errors
///
/// Returns `SessionRejection` for invalid sessions or store failures.
pub async fn resolve_admin(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<Option<CurrentAdmin>, SessionRejection> {
    let Some(token) = session_token_from_headers(headers) else {
        return Ok(None);
    };

    match SessionService::new(state.store()).resolve(&token).await {
        Ok(Some(admin)) => Ok(Some(admin)),
        Ok(None) => {
            tracing::info!("Rejected admin request with invalid session");
            Err(SessionRejection::InvalidSession {
                secure: state.config().is_secure(),
            })
        }
        Err(e) => Err(SessionRejection::Store(e)),
    }
}
