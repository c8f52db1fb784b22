//! In-memory store for tests.
//!
//! Mirrors the `PostgreSQL` semantics closely enough for router tests:
//! cascades, ordering, `NotFound`, and `InvalidReference` for unknown field IDs.

#![allow(clippy::indexing_slicing, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use secrecy::SecretString;

use hactor_core::{
    ActivityFieldId, ActivityId, AdminId, DEFAULT_ACTIVITY_FIELDS, LEGACY_PWNABLE_CODE, MemberId,
    PWNABLE_CODE,
};

use super::{
    ActivityRepository, AdminRepository, MemberRepository, RepositoryError, SessionRepository,
    Store,
};
use crate::models::{
    Activity, ActivityChanges, ActivityField, Admin, MarqueeMember, MarqueeTag, Member,
    MemberChanges, MemberField, NewActivity, NewAdmin, NewSession, SessionOwner, SessionRecord,
};

/// bcrypt cost used by test fixtures.
pub const TEST_BCRYPT_COST: u32 = 4;

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    admins: Vec<Admin>,
    sessions: HashMap<String, NewSession>,
    activities: Vec<Activity>,
    members: Vec<Member>,
    fields: Vec<ActivityField>,
    tags: Vec<Tag>,
    next_field_id: i32,
    next_seq: u64,
    unavailable: bool,
}

struct Tag {
    member_id: MemberId,
    field_id: ActivityFieldId,
    seq: u64,
}

impl State {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn add_field(
        &mut self,
        code: &str,
        label: &str,
        sort_order: i32,
        is_active: bool,
    ) -> ActivityFieldId {
        self.next_field_id += 1;
        let id = ActivityFieldId::new(self.next_field_id);
        self.fields.push(ActivityField {
            id,
            code: code.to_string(),
            label: label.to_string(),
            sort_order,
            is_active,
        });
        id
    }

    fn field_position(&self, code: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.code == code)
    }

    fn active_tags(&self, member_id: MemberId) -> Vec<&ActivityField> {
        let mut tags: Vec<&Tag> = self
            .tags
            .iter()
            .filter(|t| t.member_id == member_id)
            .collect();
        tags.sort_by_key(|t| t.seq);
        tags.iter()
            .filter_map(|t| self.fields.iter().find(|f| f.id == t.field_id))
            .filter(|f| f.is_active)
            .collect()
    }

    fn materialize(&self, member: &Member) -> Member {
        let mut member = member.clone();
        member.fields = self
            .active_tags(member.id)
            .into_iter()
            .map(|f| MemberField {
                field_id: f.id,
                label: f.label.clone(),
            })
            .collect();
        member
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert an admin with a bcrypt-hashed password.
    ///
    /// # Panics
    ///
    /// Panics if bcrypt fails to hash, which only happens for invalid costs.
    #[allow(clippy::unwrap_used)]
    pub fn insert_admin(&self, username: &str, password: &str, is_active: bool) -> Admin {
        let hash = bcrypt::hash(password, TEST_BCRYPT_COST).unwrap();
        let admin = Admin {
            id: AdminId::generate(),
            username: username.to_string(),
            password_hash: SecretString::from(hash),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state().admins.push(admin.clone());
        admin
    }

    /// Remove an admin and, like the foreign key would, its sessions.
    pub fn remove_admin(&self, id: AdminId) {
        let mut state = self.state();
        state.admins.retain(|a| a.id != id);
        state.sessions.retain(|_, s| s.admin_id != id);
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> usize {
        self.state().sessions.len()
    }

    /// Move every session's expiry into the past.
    pub fn expire_all_sessions(&self) {
        let past = Utc::now() - Duration::seconds(1);
        for session in self.state().sessions.values_mut() {
            session.expires_at = past;
        }
    }

    /// Make `ping` fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state().unavailable = unavailable;
    }

    /// Add a catalogue field.
    pub fn insert_field(
        &self,
        code: &str,
        label: &str,
        sort_order: i32,
        is_active: bool,
    ) -> ActivityFieldId {
        self.state().add_field(code, label, sort_order, is_active)
    }

    /// Codes of every catalogue field, active or not, ordered by sort order.
    pub fn field_codes(&self) -> Vec<String> {
        let state = self.state();
        let mut fields: Vec<&ActivityField> = state.fields.iter().collect();
        fields.sort_by_key(|f| (f.sort_order, f.id));
        fields.iter().map(|f| f.code.clone()).collect()
    }

    /// Add a roster member.
    pub fn insert_member(
        &self,
        display_name: &str,
        username: Option<&str>,
        is_active: bool,
    ) -> MemberId {
        let id = MemberId::generate();
        self.state().members.push(Member {
            id,
            discord_id: None,
            display_name: display_name.to_string(),
            username: username.map(ToString::to_string),
            avatar_url: None,
            discord_joined_at: None,
            is_active,
            fields: Vec::new(),
        });
        id
    }

    /// Tag a member with a field.
    pub fn assign_field(&self, member_id: MemberId, field_id: ActivityFieldId) {
        let mut state = self.state();
        let seq = state.seq();
        state.tags.push(Tag {
            member_id,
            field_id,
            seq,
        });
    }

    /// IDs of every field a member is tagged with, active or not.
    pub fn member_tag_ids(&self, member_id: MemberId) -> Vec<ActivityFieldId> {
        let state = self.state();
        let mut tags: Vec<&Tag> = state.tags.iter().filter(|t| t.member_id == member_id).collect();
        tags.sort_by_key(|t| t.seq);
        tags.iter().map(|t| t.field_id).collect()
    }
}

#[async_trait]
impl AdminRepository for MemoryStore {
    async fn find_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, RepositoryError> {
        Ok(self
            .state()
            .admins
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError> {
        let mut state = self.state();
        if state.admins.iter().any(|a| a.username == admin.username) {
            return Err(RepositoryError::Conflict("admin_username_key".to_string()));
        }
        let admin = Admin {
            id: AdminId::generate(),
            username: admin.username,
            password_hash: admin.password_hash,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.admins.push(admin.clone());
        Ok(admin)
    }

    async fn set_admin_active(
        &self,
        username: &str,
        is_active: bool,
    ) -> Result<Admin, RepositoryError> {
        let mut state = self.state();
        let admin = state
            .admins
            .iter_mut()
            .find(|a| a.username == username)
            .ok_or(RepositoryError::NotFound)?;
        admin.is_active = is_active;
        admin.updated_at = Utc::now();
        Ok(admin.clone())
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create_session(&self, session: NewSession) -> Result<(), RepositoryError> {
        let mut state = self.state();
        if !state.admins.iter().any(|a| a.id == session.admin_id) {
            return Err(RepositoryError::InvalidReference(
                "admin_session_admin_id_fkey".to_string(),
            ));
        }
        state.sessions.insert(session.token_hash.clone(), session);
        Ok(())
    }

    async fn find_session(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, RepositoryError> {
        let state = self.state();
        Ok(state.sessions.get(token_hash).map(|s| SessionRecord {
            token_hash: s.token_hash.clone(),
            admin_id: s.admin_id,
            expires_at: s.expires_at,
            owner: state
                .admins
                .iter()
                .find(|a| a.id == s.admin_id)
                .map(|a| SessionOwner {
                    username: a.username.clone(),
                    is_active: a.is_active,
                }),
        }))
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        Ok(self.state().sessions.remove(token_hash).is_some())
    }

    async fn delete_sessions_for_admin(&self, admin_id: AdminId) -> Result<u64, RepositoryError> {
        let mut state = self.state();
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.admin_id != admin_id);
        Ok((before - state.sessions.len()) as u64)
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn list_activities(&self) -> Result<Vec<Activity>, RepositoryError> {
        Ok(self.state().activities.iter().rev().cloned().collect())
    }

    async fn activity_feed(&self) -> Result<Vec<Activity>, RepositoryError> {
        let mut activities: Vec<Activity> = self.state().activities.iter().rev().cloned().collect();
        activities.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(activities)
    }

    async fn create_activity(&self, activity: NewActivity) -> Result<Activity, RepositoryError> {
        let now = Utc::now();
        let created = Activity {
            id: ActivityId::generate(),
            title: activity.title,
            category: activity.category,
            date: activity.date,
            date_label: activity.date.label(),
            year: activity.date.year(),
            content: activity.content,
            image_urls: activity.image_urls.into_inner(),
            created_at: now,
            updated_at: now,
        };
        self.state().activities.push(created.clone());
        Ok(created)
    }

    async fn update_activity(
        &self,
        id: ActivityId,
        changes: ActivityChanges,
    ) -> Result<Activity, RepositoryError> {
        let mut state = self.state();
        let activity = state
            .activities
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(RepositoryError::NotFound)?;
        changes.apply_to(activity, Utc::now());
        Ok(activity.clone())
    }

    async fn delete_activity(&self, id: ActivityId) -> Result<bool, RepositoryError> {
        let mut state = self.state();
        let before = state.activities.len();
        state.activities.retain(|a| a.id != id);
        Ok(state.activities.len() < before)
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn list_members(&self) -> Result<Vec<Member>, RepositoryError> {
        let state = self.state();
        Ok(state.members.iter().rev().map(|m| state.materialize(m)).collect())
    }

    async fn list_active_fields(&self) -> Result<Vec<ActivityField>, RepositoryError> {
        let state = self.state();
        let mut fields: Vec<ActivityField> = state
            .fields
            .iter()
            .filter(|f| f.is_active)
            .cloned()
            .collect();
        fields.sort_by_key(|f| (f.sort_order, f.id));
        Ok(fields)
    }

    async fn update_member(
        &self,
        id: MemberId,
        changes: MemberChanges,
    ) -> Result<Member, RepositoryError> {
        let mut state = self.state();
        let index = state
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(field_ids) = &changes.field_ids {
            if let Some(unknown) = field_ids
                .iter()
                .find(|fid| !state.fields.iter().any(|f| f.id == **fid))
            {
                return Err(RepositoryError::InvalidReference(format!("field {unknown}")));
            }
        }

        let member = &mut state.members[index];
        if let Some(display_name) = changes.display_name {
            member.display_name = display_name.into_inner();
        }
        if let Some(username) = changes.username {
            member.username = username;
        }
        if let Some(is_active) = changes.is_active {
            member.is_active = is_active;
        }
        if let Some(joined_at) = changes.discord_joined_at {
            member.discord_joined_at = joined_at;
        }

        if let Some(field_ids) = changes.field_ids {
            state.tags.retain(|t| t.member_id != id);
            for field_id in field_ids {
                let seq = state.seq();
                state.tags.push(Tag {
                    member_id: id,
                    field_id,
                    seq,
                });
            }
        }

        let member = state.members[index].clone();
        Ok(state.materialize(&member))
    }

    async fn delete_member(&self, id: MemberId) -> Result<bool, RepositoryError> {
        let mut state = self.state();
        let before = state.members.len();
        state.members.retain(|m| m.id != id);
        state.tags.retain(|t| t.member_id != id);
        Ok(state.members.len() < before)
    }

    async fn list_marquee_members(&self) -> Result<Vec<MarqueeMember>, RepositoryError> {
        let state = self.state();
        let mut members: Vec<MarqueeMember> = state
            .members
            .iter()
            .filter(|m| m.is_active)
            .filter_map(|m| {
                let handle = m.username.clone()?;
                Some(MarqueeMember {
                    id: m.id,
                    name: m.display_name.clone(),
                    handle,
                    tags: state
                        .active_tags(m.id)
                        .into_iter()
                        .map(|f| MarqueeTag::from_field(&f.code, &f.label))
                        .collect(),
                })
            })
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn sync_default_fields(&self) -> Result<(), RepositoryError> {
        let mut state = self.state();

        match (
            state.field_position(LEGACY_PWNABLE_CODE),
            state.field_position(PWNABLE_CODE),
        ) {
            (Some(legacy), Some(canonical)) => {
                let legacy_id = state.fields[legacy].id;
                let canonical_id = state.fields[canonical].id;
                let moved: Vec<(MemberId, u64)> = state
                    .tags
                    .iter()
                    .filter(|t| t.field_id == legacy_id)
                    .map(|t| (t.member_id, t.seq))
                    .collect();
                for (member_id, seq) in moved {
                    let exists = state
                        .tags
                        .iter()
                        .any(|t| t.member_id == member_id && t.field_id == canonical_id);
                    if !exists {
                        state.tags.push(Tag {
                            member_id,
                            field_id: canonical_id,
                            seq,
                        });
                    }
                }
                state.tags.retain(|t| t.field_id != legacy_id);
                state.fields.retain(|f| f.id != legacy_id);
            }
            (Some(legacy), None) => {
                state.fields[legacy].code = PWNABLE_CODE.to_string();
            }
            _ => {}
        }

        for default in &DEFAULT_ACTIVITY_FIELDS {
            if let Some(index) = state.field_position(default.code) {
                let field = &mut state.fields[index];
                field.label = default.label.to_string();
                field.sort_order = default.sort_order;
                field.is_active = true;
            } else {
                state.add_field(default.code, default.label, default.sort_order, true);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        if self.state().unavailable {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sync_default_fields_seeds_catalogue() {
        let store = MemoryStore::new();
        store.sync_default_fields().await.unwrap();
        store.sync_default_fields().await.unwrap();

        assert_eq!(
            store.field_codes(),
            vec!["web", "pwnable", "reverse", "forensic", "dev"]
        );
    }

    #[tokio::test]
    async fn test_sync_renames_lone_legacy_field() {
        let store = MemoryStore::new();
        let legacy = store.insert_field(LEGACY_PWNABLE_CODE, "Pawnable", 99, false);
        let member = store.insert_member("Alice", Some("alice"), true);
        store.assign_field(member, legacy);

        store.sync_default_fields().await.unwrap();

        let fields = store.list_active_fields().await.unwrap();
        let pwnable = fields.iter().find(|f| f.code == PWNABLE_CODE).unwrap();
        assert_eq!(pwnable.id, legacy);
        assert_eq!(pwnable.label, "Pwnable");
        assert_eq!(pwnable.sort_order, 20);
        assert_eq!(store.member_tag_ids(member), vec![legacy]);
    }

    #[tokio::test]
    async fn test_sync_merges_legacy_into_canonical() {
        let store = MemoryStore::new();
        let legacy = store.insert_field(LEGACY_PWNABLE_CODE, "Pawnable", 20, true);
        let canonical = store.insert_field(PWNABLE_CODE, "Pwnable", 20, true);
        let alice = store.insert_member("Alice", Some("alice"), true);
        let bob = store.insert_member("Bob", Some("bob"), true);
        store.assign_field(alice, legacy);
        store.assign_field(bob, legacy);
        store.assign_field(bob, canonical);

        store.sync_default_fields().await.unwrap();

        assert_eq!(store.member_tag_ids(alice), vec![canonical]);
        assert_eq!(store.member_tag_ids(bob), vec![canonical]);
        assert!(!store.field_codes().contains(&LEGACY_PWNABLE_CODE.to_string()));
    }

    #[tokio::test]
    async fn test_update_member_rejects_unknown_field_atomically() {
        let store = MemoryStore::new();
        let web = store.insert_field("web", "Web", 10, true);
        let member = store.insert_member("Alice", None, true);
        store.assign_field(member, web);

        let changes = MemberChanges {
            is_active: Some(false),
            field_ids: Some(vec![ActivityFieldId::new(999)]),
            ..Default::default()
        };
        let err = store.update_member(member, changes).await.unwrap_err();
        assert!(matches!(err, RepositoryError::InvalidReference(_)));

        let members = store.list_members().await.unwrap();
        assert!(members[0].is_active);
        assert_eq!(store.member_tag_ids(member), vec![web]);
    }

    #[tokio::test]
    async fn test_delete_member_cascades_tags() {
        let store = MemoryStore::new();
        let web = store.insert_field("web", "Web", 10, true);
        let member = store.insert_member("Alice", None, true);
        store.assign_field(member, web);

        assert!(store.delete_member(member).await.unwrap());
        assert!(store.member_tag_ids(member).is_empty());
        assert!(!store.delete_member(member).await.unwrap());
    }
}
