//! Activity repository for `PostgreSQL`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use hactor_core::{ActivityDate, ActivityId};

use super::{ActivityRepository, PgStore, RepositoryError};
use crate::models::{Activity, ActivityChanges, NewActivity};

const ACTIVITY_COLUMNS: &str = "id, title, category, date, date_label, year, content, image_urls, \
                                created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    title: String,
    category: String,
    date: NaiveDate,
    date_label: String,
    year: i32,
    content: Option<String>,
    image_urls: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = RepositoryError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let date = ActivityDate::from_date(row.date).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid activity date in database: {e}"))
        })?;

        if row.year != date.year() || row.date_label != date.label() {
            return Err(RepositoryError::DataCorruption(format!(
                "activity {} has year/label out of sync with its date",
                row.id
            )));
        }

        Ok(Self {
            id: ActivityId::new(row.id),
            title: row.title,
            category: row.category,
            date,
            date_label: row.date_label,
            year: row.year,
            content: row.content,
            image_urls: row.image_urls,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PgStore {
    async fn fetch_activities(&self, order_by: &str) -> Result<Vec<Activity>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityRow>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity ORDER BY {order_by}"
        ))
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[async_trait]
impl ActivityRepository for PgStore {
    async fn list_activities(&self) -> Result<Vec<Activity>, RepositoryError> {
        self.fetch_activities("created_at DESC").await
    }

    async fn activity_feed(&self) -> Result<Vec<Activity>, RepositoryError> {
        self.fetch_activities("date DESC, created_at DESC").await
    }

    async fn create_activity(&self, activity: NewActivity) -> Result<Activity, RepositoryError> {
        let row = sqlx::query_as::<_, ActivityRow>(&format!(
            "INSERT INTO activity (id, title, category, date, date_label, year, content, image_urls)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(ActivityId::generate().as_uuid())
        .bind(&activity.title)
        .bind(&activity.category)
        .bind(activity.date.date())
        .bind(activity.date.label())
        .bind(activity.date.year())
        .bind(&activity.content)
        .bind(activity.image_urls.into_inner())
        .fetch_one(self.pool())
        .await?;

        row.try_into()
    }

    async fn update_activity(
        &self,
        id: ActivityId,
        changes: ActivityChanges,
    ) -> Result<Activity, RepositoryError> {
        let mut query = QueryBuilder::<Postgres>::new("UPDATE activity SET updated_at = NOW()");

        if let Some(title) = changes.title {
            query.push(", title = ").push_bind(title);
        }
        if let Some(category) = changes.category {
            query.push(", category = ").push_bind(category);
        }
        if let Some(date) = changes.date {
            query
                .push(", date = ")
                .push_bind(date.date())
                .push(", date_label = ")
                .push_bind(date.label())
                .push(", year = ")
                .push_bind(date.year());
        }
        if let Some(content) = changes.content {
            query.push(", content = ").push_bind(content);
        }
        if let Some(image_urls) = changes.image_urls {
            query.push(", image_urls = ").push_bind(image_urls.into_inner());
        }

        query
            .push(" WHERE id = ")
            .push_bind(id.as_uuid())
            .push(" RETURNING ")
            .push(ACTIVITY_COLUMNS);

        let row = query
            .build_query_as::<ActivityRow>()
            .fetch_optional(self.pool())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        row.try_into()
    }

    async fn delete_activity(&self, id: ActivityId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM activity WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
