//! Public read-only feeds for the marketing pages.

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// All activities, latest date first.
///
/// GET /api/activities
pub async fn activities(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let activities = state.store().activity_feed().await?;
    Ok(Json(json!({ "ok": true, "activities": activities })))
}

/// Active members with a handle, decorated with field tags.
///
/// GET /api/members/marquee
pub async fn marquee(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let members = state.store().list_marquee_members().await?;
    Ok(Json(json!({ "ok": true, "members": members })))
}
