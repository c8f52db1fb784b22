//! Repository traits.
//!
//! Handlers and services only see these traits; `PgStore` implements them
//! for production and `memory::MemoryStore` for tests.

use async_trait::async_trait;

use hactor_core::{ActivityId, AdminId, MemberId};

use super::RepositoryError;
use crate::models::{
    Activity, ActivityChanges, ActivityField, Admin, MarqueeMember, Member, MemberChanges,
    NewActivity, NewAdmin, NewSession, SessionRecord,
};

/// Admin account repository.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Find an admin by exact username.
    async fn find_admin_by_username(&self, username: &str)
    -> Result<Option<Admin>, RepositoryError>;

    /// Create an admin. A taken username is a `Conflict`.
    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, RepositoryError>;

    /// Enable or disable an admin. Unknown usernames are `NotFound`.
    async fn set_admin_active(
        &self,
        username: &str,
        is_active: bool,
    ) -> Result<Admin, RepositoryError>;
}

/// Session repository.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a new session.
    async fn create_session(&self, session: NewSession) -> Result<(), RepositoryError>;

    /// Find a session by token hash, joined with its owning admin.
    ///
    /// Expired sessions are returned as-is; callers decide validity.
    async fn find_session(&self, token_hash: &str)
    -> Result<Option<SessionRecord>, RepositoryError>;

    /// Delete a session. Returns `false` if it did not exist.
    async fn delete_session(&self, token_hash: &str) -> Result<bool, RepositoryError>;

    /// Delete every session of an admin, returning how many were removed.
    async fn delete_sessions_for_admin(&self, admin_id: AdminId) -> Result<u64, RepositoryError>;
}

/// Activity repository.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// All activities, most recently created first.
    async fn list_activities(&self) -> Result<Vec<Activity>, RepositoryError>;

    /// All activities for the public feed, latest date first.
    async fn activity_feed(&self) -> Result<Vec<Activity>, RepositoryError>;

    /// Insert an activity.
    async fn create_activity(&self, activity: NewActivity) -> Result<Activity, RepositoryError>;

    /// Apply a partial update in a single statement. Unknown IDs are `NotFound`.
    async fn update_activity(
        &self,
        id: ActivityId,
        changes: ActivityChanges,
    ) -> Result<Activity, RepositoryError>;

    /// Delete an activity. Returns `false` if it did not exist.
    async fn delete_activity(&self, id: ActivityId) -> Result<bool, RepositoryError>;
}

/// Member roster repository.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// All members, most recently created first, with their active tags.
    async fn list_members(&self) -> Result<Vec<Member>, RepositoryError>;

    /// The active field catalogue ordered by sort order.
    async fn list_active_fields(&self) -> Result<Vec<ActivityField>, RepositoryError>;

    /// Apply a partial update; tag replacement happens in the same transaction.
    ///
    /// Unknown member IDs are `NotFound`; unknown field IDs are
    /// `InvalidReference`.
    async fn update_member(
        &self,
        id: MemberId,
        changes: MemberChanges,
    ) -> Result<Member, RepositoryError>;

    /// Hard-delete a member and its tags. Returns `false` if it did not exist.
    async fn delete_member(&self, id: MemberId) -> Result<bool, RepositoryError>;

    /// Active members with a handle, ordered by display name.
    async fn list_marquee_members(&self) -> Result<Vec<MarqueeMember>, RepositoryError>;

    /// Seed the default field catalogue and migrate the legacy pwnable code.
    ///
    /// Idempotent; runs in one transaction.
    async fn sync_default_fields(&self) -> Result<(), RepositoryError>;
}

/// Everything the site backend needs from persistence.
#[async_trait]
pub trait Store:
    AdminRepository + SessionRepository + ActivityRepository + MemberRepository
{
    /// Check that the store answers.
    async fn ping(&self) -> Result<(), RepositoryError>;
}
