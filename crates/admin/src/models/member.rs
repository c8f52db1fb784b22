//! Member roster domain types.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use hactor_core::{ActivityFieldId, DisplayName, MemberId, TagTone, tag_label};

/// A roster member as shown in the admin console.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    /// Discord snowflake; serialized as a string so JS clients keep every digit.
    #[serde(serialize_with = "serialize_opt_i64_as_string")]
    pub discord_id: Option<i64>,
    pub display_name: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub discord_joined_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// Active field tags, in assignment order.
    pub fields: Vec<MemberField>,
}

/// A field tag assigned to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberField {
    pub field_id: ActivityFieldId,
    pub label: String,
}

/// An entry in the activity field catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityField {
    pub id: ActivityFieldId,
    pub code: String,
    pub label: String,
    #[serde(skip)]
    pub sort_order: i32,
    #[serde(skip)]
    pub is_active: bool,
}

/// A validated partial member update.
///
/// `None` leaves a column untouched. For nullable columns `Some(None)`
/// clears them. `field_ids: Some(vec![])` removes every tag.
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub display_name: Option<DisplayName>,
    pub username: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub discord_joined_at: Option<Option<DateTime<Utc>>>,
    pub field_ids: Option<Vec<ActivityFieldId>>,
}

impl MemberChanges {
    /// Returns `true` if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.username.is_none()
            && self.is_active.is_none()
            && self.discord_joined_at.is_none()
            && self.field_ids.is_none()
    }

    /// Returns `true` if any member column (not tags) changes.
    #[must_use]
    pub const fn touches_member_row(&self) -> bool {
        self.display_name.is_some()
            || self.username.is_some()
            || self.is_active.is_some()
            || self.discord_joined_at.is_some()
    }
}

/// A member card for the public marquee.
#[derive(Debug, Clone, Serialize)]
pub struct MarqueeMember {
    pub id: MemberId,
    pub name: String,
    pub handle: String,
    pub tags: Vec<MarqueeTag>,
}

/// A decorated field tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarqueeTag {
    pub label: String,
    pub tone: TagTone,
}

impl MarqueeTag {
    /// Decorate a field for display.
    #[must_use]
    pub fn from_field(code: &str, label: &str) -> Self {
        Self {
            label: tag_label(code, label),
            tone: TagTone::for_field(code, label),
        }
    }
}

#[allow(clippy::ref_option)]
fn serialize_opt_i64_as_string<S>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}
