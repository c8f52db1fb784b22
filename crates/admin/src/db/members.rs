//! Member roster and activity field repository for `PostgreSQL`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, Postgres, QueryBuilder};
use uuid::Uuid;

use hactor_core::{
    ActivityFieldId, DEFAULT_ACTIVITY_FIELDS, LEGACY_PWNABLE_CODE, MemberId, PWNABLE_CODE,
};

use super::{MemberRepository, PgStore, RepositoryError};
use crate::models::{
    ActivityField, MarqueeMember, MarqueeTag, Member, MemberChanges, MemberField,
};

const MEMBER_COLUMNS: &str =
    "id, discord_id, display_name, username, avatar_url, discord_joined_at, is_active";

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    discord_id: Option<i64>,
    display_name: String,
    username: Option<String>,
    avatar_url: Option<String>,
    discord_joined_at: Option<DateTime<Utc>>,
    is_active: bool,
}

impl MemberRow {
    fn into_member(self, fields: Vec<MemberField>) -> Member {
        Member {
            id: MemberId::new(self.id),
            discord_id: self.discord_id,
            display_name: self.display_name,
            username: self.username,
            avatar_url: self.avatar_url,
            discord_joined_at: self.discord_joined_at,
            is_active: self.is_active,
            fields,
        }
    }
}

/// An active field tag joined with its catalogue entry.
#[derive(sqlx::FromRow)]
struct TagRow {
    member_id: Uuid,
    field_id: i32,
    code: String,
    label: String,
}

#[derive(sqlx::FromRow)]
struct FieldRow {
    id: i32,
    code: String,
    label: String,
    sort_order: i32,
    is_active: bool,
}

impl From<FieldRow> for ActivityField {
    fn from(row: FieldRow) -> Self {
        Self {
            id: ActivityFieldId::new(row.id),
            code: row.code,
            label: row.label,
            sort_order: row.sort_order,
            is_active: row.is_active,
        }
    }
}

/// Active-field tags, grouped by member, in assignment order.
async fn fetch_tags(
    conn: &mut PgConnection,
    member: Option<Uuid>,
) -> Result<HashMap<Uuid, Vec<TagRow>>, RepositoryError> {
    let rows = sqlx::query_as::<_, TagRow>(
        r"
        SELECT maf.member_id, maf.field_id, f.code, f.label
        FROM member_activity_field maf
        JOIN activity_field f ON f.id = maf.field_id
        WHERE f.is_active AND ($1::uuid IS NULL OR maf.member_id = $1)
        ORDER BY maf.assigned_at, maf.position, maf.field_id
        ",
    )
    .bind(member)
    .fetch_all(conn)
    .await?;

    let mut tags: HashMap<Uuid, Vec<TagRow>> = HashMap::new();
    for row in rows {
        tags.entry(row.member_id).or_default().push(row);
    }
    Ok(tags)
}

fn member_fields(tags: Vec<TagRow>) -> Vec<MemberField> {
    tags.into_iter()
        .map(|tag| MemberField {
            field_id: ActivityFieldId::new(tag.field_id),
            label: tag.label,
        })
        .collect()
}

async fn fetch_member(conn: &mut PgConnection, id: Uuid) -> Result<Member, RepositoryError> {
    let row = sqlx::query_as::<_, MemberRow>(&format!(
        "SELECT {MEMBER_COLUMNS} FROM member WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(RepositoryError::NotFound)?;

    let mut tags = fetch_tags(conn, Some(id)).await?;
    let fields = member_fields(tags.remove(&id).unwrap_or_default());
    Ok(row.into_member(fields))
}

async fn find_field_id(
    conn: &mut PgConnection,
    code: &str,
) -> Result<Option<i32>, RepositoryError> {
    let id = sqlx::query_scalar::<_, i32>("SELECT id FROM activity_field WHERE code = $1")
        .bind(code)
        .fetch_optional(conn)
        .await?;
    Ok(id)
}

#[async_trait]
impl MemberRepository for PgStore {
    async fn list_members(&self) -> Result<Vec<Member>, RepositoryError> {
        let mut conn = self.pool().acquire().await?;

        let rows = sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {MEMBER_COLUMNS} FROM member ORDER BY created_at DESC"
        ))
        .fetch_all(&mut *conn)
        .await?;

        let mut tags = fetch_tags(&mut conn, None).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let fields = member_fields(tags.remove(&row.id).unwrap_or_default());
                row.into_member(fields)
            })
            .collect())
    }

    async fn list_active_fields(&self) -> Result<Vec<ActivityField>, RepositoryError> {
        let rows = sqlx::query_as::<_, FieldRow>(
            r"
            SELECT id, code, label, sort_order, is_active
            FROM activity_field
            WHERE is_active
            ORDER BY sort_order, id
            ",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_member(
        &self,
        id: MemberId,
        changes: MemberChanges,
    ) -> Result<Member, RepositoryError> {
        let member_id = id.as_uuid();
        let mut tx = self.pool().begin().await?;

        let found = if changes.touches_member_row() {
            let mut query =
                QueryBuilder::<Postgres>::new("UPDATE member SET updated_at = NOW()");

            if let Some(display_name) = changes.display_name {
                query
                    .push(", display_name = ")
                    .push_bind(display_name.into_inner());
            }
            if let Some(username) = changes.username {
                query.push(", username = ").push_bind(username);
            }
            if let Some(is_active) = changes.is_active {
                query.push(", is_active = ").push_bind(is_active);
            }
            if let Some(joined_at) = changes.discord_joined_at {
                query.push(", discord_joined_at = ").push_bind(joined_at);
            }
            query
                .push(" WHERE id = ")
                .push_bind(member_id)
                .push(" RETURNING id");

            query
                .build_query_scalar::<Uuid>()
                .fetch_optional(&mut *tx)
                .await?
        } else {
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM member WHERE id = $1 FOR UPDATE")
                .bind(member_id)
                .fetch_optional(&mut *tx)
                .await?
        };

        if found.is_none() {
            return Err(RepositoryError::NotFound);
        }

        if let Some(field_ids) = changes.field_ids {
            sqlx::query("DELETE FROM member_activity_field WHERE member_id = $1")
                .bind(member_id)
                .execute(&mut *tx)
                .await?;

            if !field_ids.is_empty() {
                let raw: Vec<i32> = field_ids.into_iter().map(i32::from).collect();
                sqlx::query(
                    r"
                    INSERT INTO member_activity_field (member_id, field_id, position)
                    SELECT $1, t.field_id, t.ord::int4
                    FROM UNNEST($2::int4[]) WITH ORDINALITY AS t(field_id, ord)
                    ",
                )
                .bind(member_id)
                .bind(raw)
                .execute(&mut *tx)
                .await
                .map_err(RepositoryError::from_constraint)?;
            }
        }

        let member = fetch_member(&mut tx, member_id).await?;
        tx.commit().await?;

        Ok(member)
    }

    async fn delete_member(&self, id: MemberId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM member WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_marquee_members(&self) -> Result<Vec<MarqueeMember>, RepositoryError> {
        let mut conn = self.pool().acquire().await?;

        let rows = sqlx::query_as::<_, (Uuid, String, String)>(
            r"
            SELECT id, display_name, username
            FROM member
            WHERE is_active AND username IS NOT NULL
            ORDER BY display_name ASC
            ",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut tags = fetch_tags(&mut conn, None).await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, handle)| MarqueeMember {
                id: MemberId::new(id),
                name,
                handle,
                tags: tags
                    .remove(&id)
                    .unwrap_or_default()
                    .iter()
                    .map(|tag| MarqueeTag::from_field(&tag.code, &tag.label))
                    .collect(),
            })
            .collect())
    }

    async fn sync_default_fields(&self) -> Result<(), RepositoryError> {
        let mut tx = self.pool().begin().await?;

        let legacy = find_field_id(&mut tx, LEGACY_PWNABLE_CODE).await?;
        let canonical = find_field_id(&mut tx, PWNABLE_CODE).await?;

        match (legacy, canonical) {
            (Some(legacy_id), Some(canonical_id)) => {
                let moved = sqlx::query(
                    r"
                    INSERT INTO member_activity_field (member_id, field_id, assigned_at, position)
                    SELECT member_id, $2, assigned_at, position
                    FROM member_activity_field
                    WHERE field_id = $1
                    ON CONFLICT DO NOTHING
                    ",
                )
                .bind(legacy_id)
                .bind(canonical_id)
                .execute(&mut *tx)
                .await?;

                sqlx::query("DELETE FROM member_activity_field WHERE field_id = $1")
                    .bind(legacy_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("DELETE FROM activity_field WHERE id = $1")
                    .bind(legacy_id)
                    .execute(&mut *tx)
                    .await?;

                tracing::info!(
                    moved_links = moved.rows_affected(),
                    "Merged legacy pawnable field into pwnable"
                );
            }
            (Some(legacy_id), None) => {
                sqlx::query("UPDATE activity_field SET code = $2 WHERE id = $1")
                    .bind(legacy_id)
                    .bind(PWNABLE_CODE)
                    .execute(&mut *tx)
                    .await?;

                tracing::info!("Renamed legacy pawnable field to pwnable");
            }
            _ => {}
        }

        for field in &DEFAULT_ACTIVITY_FIELDS {
            sqlx::query(
                r"
                INSERT INTO activity_field (code, label, sort_order, is_active)
                VALUES ($1, $2, $3, TRUE)
                ON CONFLICT (code) DO UPDATE
                SET label = EXCLUDED.label,
                    sort_order = EXCLUDED.sort_order,
                    is_active = TRUE
                ",
            )
            .bind(field.code)
            .bind(field.label)
            .bind(field.sort_order)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
