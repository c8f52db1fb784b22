//! Admin activity CRUD.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use hactor_core::ActivityId;

use super::extract::ApiJson;
use crate::db::RepositoryError;
use crate::error::AppError;
use crate::middleware::RequireAdminSession;
use crate::state::AppState;
use crate::validation::{CreateActivityRequest, UpdateActivityRequest};

fn not_found() -> AppError {
    AppError::NotFound("Activity not found".to_string())
}

fn parse_id(id: &str) -> Result<ActivityId, AppError> {
    ActivityId::parse(id).map_err(|_| not_found())
}

/// GET /api/admin/activities
pub async fn index(
    State(state): State<AppState>,
    RequireAdminSession(_admin): RequireAdminSession,
) -> Result<impl IntoResponse, AppError> {
    let activities = state.store().list_activities().await?;
    Ok(Json(json!({ "ok": true, "activities": activities })))
}

/// POST /api/admin/activities
pub async fn create(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    ApiJson(payload): ApiJson<CreateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let activity = state.store().create_activity(payload.validate()?).await?;

    tracing::info!(
        activity_id = %activity.id,
        admin = %admin.username,
        "Activity created"
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "activity": activity })),
    ))
}

/// PATCH /api/admin/activities/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateActivityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let changes = payload.validate()?;

    let activity = state
        .store()
        .update_activity(id, changes)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(),
            other => other.into(),
        })?;

    tracing::info!(activity_id = %id, admin = %admin.username, "Activity updated");
    Ok(Json(json!({ "ok": true, "activity": activity })))
}

/// DELETE /api/admin/activities/{id}
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;

    if !state.store().delete_activity(id).await? {
        return Err(not_found());
    }

    tracing::info!(activity_id = %id, admin = %admin.username, "Activity deleted");
    Ok(Json(json!({ "ok": true })))
}
