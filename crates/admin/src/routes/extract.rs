//! Request extractors with JSON error bodies.

use axum::extract::{FromRequest, rejection::JsonRejection};

use crate::error::AppError;

/// `axum::Json` whose rejections are `400 {ok:false, message}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
