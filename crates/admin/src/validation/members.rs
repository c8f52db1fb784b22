//! Member payloads.

use serde::Deserialize;

use hactor_core::{
    DisplayName, MemberError, Patch, normalize_handle, parse_joined_at, unique_field_ids,
};

use super::ValidationError;
use crate::models::MemberChanges;

/// `PATCH /api/admin/members/{id}` body.
///
/// `fieldIds` must be a list of integers; anything else fails to
/// deserialize. `fieldIds: null` leaves the tags untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub display_name: Patch<String>,
    #[serde(default)]
    pub username: Patch<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub discord_joined_at: Patch<String>,
    #[serde(default)]
    pub field_ids: Option<Vec<i32>>,
}

impl UpdateMemberRequest {
    /// Validate the supplied fields into a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoFields` when nothing would change, or the
    /// first failing field rule.
    pub fn validate(self) -> Result<MemberChanges, ValidationError> {
        let changes = MemberChanges {
            display_name: match self.display_name {
                Patch::Absent => None,
                Patch::Null => return Err(MemberError::EmptyDisplayName.into()),
                Patch::Value(name) => Some(DisplayName::parse(&name)?),
            },
            username: self
                .username
                .into_option()
                .map(|handle| normalize_handle(handle.as_deref())),
            is_active: self.is_active,
            discord_joined_at: match self.discord_joined_at {
                Patch::Absent => None,
                Patch::Null => Some(None),
                Patch::Value(value) => Some(Some(parse_joined_at(&value)?)),
            },
            field_ids: self.field_ids.as_deref().map(unique_field_ids),
        };

        if changes.is_empty() {
            return Err(ValidationError::NoFields);
        }
        Ok(changes)
    }
}
