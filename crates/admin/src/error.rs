//! Unified error handling for the site backend.
//!
//! Every error body has the shape `{"ok": false, "message": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use hactor_core::{ActivityError, MemberError};

use crate::db::RepositoryError;
use crate::services::AuthError;
use crate::validation::ValidationError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("{0}")]
    Unauthorized(String),

    /// Request rejected by the origin check.
    #[error("{0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "ok": false, "message": message }))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials | AuthError::WeakPassword(_) => {
                Self::BadRequest(err.to_string())
            }
            AuthError::InvalidCredentials | AuthError::AdminNotFound => {
                Self::Unauthorized(AuthError::InvalidCredentials.to_string())
            }
            AuthError::AdminAlreadyExists => Self::BadRequest(err.to_string()),
            AuthError::PasswordHash => Self::Internal(err.to_string()),
            AuthError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<ActivityError> for AppError {
    fn from(err: ActivityError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<MemberError> for AppError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::EmptyDisplayName => Self::BadRequest("Display name required".to_string()),
            MemberError::InvalidJoinedAt(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::Activity(e) => e.into(),
            ValidationError::Member(e) => e.into(),
            ValidationError::NoFields => Self::BadRequest(err.to_string()),
        }
    }
}

/// Set the Sentry user context from the authenticated admin.
pub fn set_sentry_user(admin: &crate::models::CurrentAdmin) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin.admin_id.to_string()),
            username: Some(admin.username.clone()),
            ..Default::default()
        }));
    });
}
