//! Activity field catalogue commands.
//!
//! `sync` inserts any missing default field and folds the legacy
//! `pawnable` code into `pwnable`. It is idempotent; the server runs the
//! same routine at startup.

use hactor_admin::db::{MemberRepository, PgStore, RepositoryError, create_pool};
use hactor_core::DEFAULT_ACTIVITY_FIELDS;
use thiserror::Error;

use super::{DATABASE_URL_VAR, database_url};

#[derive(Debug, Error)]
pub enum FieldsError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Field sync failed: {0}")]
    Sync(#[from] RepositoryError),
}

/// Seed the default catalogue and migrate legacy codes.
///
/// # Errors
///
/// Returns `FieldsError` if the database is unreachable or the sync fails.
pub async fn sync() -> Result<(), FieldsError> {
    let database_url = database_url().ok_or(FieldsError::MissingEnvVar(DATABASE_URL_VAR))?;

    tracing::info!("Connecting to database...");
    let store = PgStore::new(create_pool(&database_url).await?);

    store.sync_default_fields().await?;

    for field in &DEFAULT_ACTIVITY_FIELDS {
        tracing::info!(
            code = field.code,
            label = field.label,
            sort_order = field.sort_order,
            "Field present"
        );
    }

    store.pool().close().await;
    tracing::info!("Field sync complete!");
    Ok(())
}
