//! Session repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use hactor_core::AdminId;

use super::{PgStore, RepositoryError, SessionRepository};
use crate::models::{NewSession, SessionOwner, SessionRecord};

#[derive(sqlx::FromRow)]
struct SessionRow {
    token_hash: String,
    admin_id: Uuid,
    expires_at: DateTime<Utc>,
    username: Option<String>,
    is_active: Option<bool>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        let owner = row.username.map(|username| SessionOwner {
            username,
            is_active: row.is_active.unwrap_or(false),
        });

        Self {
            token_hash: row.token_hash,
            admin_id: AdminId::new(row.admin_id),
            expires_at: row.expires_at,
            owner,
        }
    }
}

#[async_trait]
impl SessionRepository for PgStore {
    async fn create_session(&self, session: NewSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO admin_session (token_hash, admin_id, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(&session.token_hash)
        .bind(session.admin_id.as_uuid())
        .bind(session.expires_at)
        .execute(self.pool())
        .await
        .map_err(RepositoryError::from_constraint)?;

        Ok(())
    }

    async fn find_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, RepositoryError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r"
            SELECT s.token_hash, s.admin_id, s.expires_at, a.username, a.is_active
            FROM admin_session s
            LEFT JOIN admin a ON a.id = s.admin_id
            WHERE s.token_hash = $1
            ",
        )
        .bind(token_hash)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_session WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_sessions_for_admin(&self, admin_id: AdminId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM admin_session WHERE admin_id = $1")
            .bind(admin_id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
