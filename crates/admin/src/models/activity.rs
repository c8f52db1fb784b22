//! Activity domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use hactor_core::{ActivityDate, ActivityId, ImageUrls};

/// A club activity post.
///
/// `year` and `date_label` always mirror `date`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub category: String,
    pub date: ActivityDate,
    pub date_label: String,
    pub year: i32,
    pub content: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated activity ready to insert.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub title: String,
    pub category: String,
    pub date: ActivityDate,
    pub content: Option<String>,
    pub image_urls: ImageUrls,
}

/// A validated partial update.
///
/// `None` leaves a column untouched. For `content`, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ActivityChanges {
    pub title: Option<String>,
    pub category: Option<String>,
    pub date: Option<ActivityDate>,
    pub content: Option<Option<String>>,
    pub image_urls: Option<ImageUrls>,
}

impl ActivityChanges {
    /// Returns `true` if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.content.is_none()
            && self.image_urls.is_none()
    }

    /// Apply the changes to an in-memory activity, re-deriving the date
    /// label and year when the date changes.
    pub fn apply_to(self, activity: &mut Activity, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            activity.title = title;
        }
        if let Some(category) = self.category {
            activity.category = category;
        }
        if let Some(date) = self.date {
            activity.date = date;
            activity.date_label = date.label();
            activity.year = date.year();
        }
        if let Some(content) = self.content {
            activity.content = content;
        }
        if let Some(image_urls) = self.image_urls {
            activity.image_urls = image_urls.into_inner();
        }
        activity.updated_at = now;
    }
}
