//! Admin account repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use hactor_core::AdminId;

use super::{AdminRepository, PgStore, RepositoryError};
use crate::models::{Admin, NewAdmin};

const ADMIN_COLUMNS: &str = "id, username, password_hash, is_active, created_at, updated_at";

/// Internal row type for `PostgreSQL` admin queries.
#[derive(sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    username: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Self {
            id: AdminId::new(row.id),
            username: row.username,
            password_hash: SecretString::from(row.password_hash),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn find_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admin WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "INSERT INTO admin (id, username, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(AdminId::generate().as_uuid())
        .bind(&admin.username)
        .bind(admin.password_hash.expose_secret())
        .fetch_one(self.pool())
        .await
        .map_err(RepositoryError::from_constraint)?;

        Ok(row.into())
    }

    async fn set_admin_active(
        &self,
        username: &str,
        is_active: bool,
    ) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(&format!(
            "UPDATE admin SET is_active = $2, updated_at = NOW()
             WHERE username = $1
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(username)
        .bind(is_active)
        .fetch_optional(self.pool())
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
