//! Same-origin check for state-changing admin requests.

use axum::{
    extract::{Request, State},
    http::{Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Reject mutating requests whose `Origin` is missing or not allow-listed.
///
/// Safe methods pass through untouched.
pub async fn require_same_origin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_safe_method(request.method()) {
        return next.run(request).await;
    }

    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());

    match origin {
        Some(origin) if state.config().is_allowed_origin(origin) => next.run(request).await,
        _ => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                origin = origin.unwrap_or("<missing>"),
                "Rejected request with forbidden origin"
            );
            AppError::Forbidden("Forbidden origin".to_string()).into_response()
        }
    }
}

fn is_safe_method(method: &Method) -> bool {
    [Method::GET, Method::HEAD, Method::OPTIONS].contains(method)
}
