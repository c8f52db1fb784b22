//! Admin member roster management.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;

use hactor_core::MemberId;

use super::extract::ApiJson;
use crate::db::RepositoryError;
use crate::error::AppError;
use crate::middleware::RequireAdminSession;
use crate::state::AppState;
use crate::validation::UpdateMemberRequest;

fn not_found() -> AppError {
    AppError::NotFound("Member not found".to_string())
}

fn parse_id(id: &str) -> Result<MemberId, AppError> {
    MemberId::parse(id).map_err(|_| not_found())
}

/// Members with their tags, plus the active field catalogue.
///
/// GET /api/admin/members
pub async fn index(
    State(state): State<AppState>,
    RequireAdminSession(_admin): RequireAdminSession,
) -> Result<impl IntoResponse, AppError> {
    let store = state.store();
    let (members, fields) = tokio::try_join!(store.list_members(), store.list_active_fields())?;

    Ok(Json(json!({ "ok": true, "members": members, "fields": fields })))
}

/// PATCH /api/admin/members/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let changes = payload.validate()?;

    let member = state
        .store()
        .update_member(id, changes)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => not_found(),
            RepositoryError::InvalidReference(_) => {
                AppError::BadRequest("Unknown field id".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(member_id = %id, admin = %admin.username, "Member updated");
    Ok(Json(json!({ "ok": true, "member": member })))
}

/// Hard delete; tag links cascade.
///
/// DELETE /api/admin/members/{id}
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdminSession(admin): RequireAdminSession,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;

    if !state.store().delete_member(id).await? {
        return Err(not_found());
    }

    tracing::info!(member_id = %id, admin = %admin.username, "Member deleted");
    Ok(Json(json!({ "ok": true })))
}
