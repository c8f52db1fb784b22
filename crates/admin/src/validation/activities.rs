//! Activity payloads.
//!
//! Clients may send `dateLabel` and `year`; both are ignored because they
//! are derived from `date`.

use serde::Deserialize;

use hactor_core::{ActivityDate, ActivityError, ImageUrls, Patch, optional_text, required_text};

use super::ValidationError;
use crate::models::{ActivityChanges, NewActivity};

/// `POST /api/admin/activities` body.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

impl CreateActivityRequest {
    /// Validate into an insertable activity.
    ///
    /// # Errors
    ///
    /// Returns the first failing field rule.
    pub fn validate(self) -> Result<NewActivity, ValidationError> {
        let title = required_text(self.title.as_deref().unwrap_or_default(), "title")?;
        let category = required_text(self.category.as_deref().unwrap_or_default(), "category")?;
        let date = parse_date(self.date.as_deref())?;

        Ok(NewActivity {
            title,
            category,
            date,
            content: optional_text(self.content.as_deref()),
            image_urls: ImageUrls::parse(self.image_urls.unwrap_or_default())?,
        })
    }
}

/// `PATCH /api/admin/activities/{id}` body.
///
/// Absent keys are left untouched. `content: null` clears the content;
/// `imageUrls: null` or `[]` clears the images. Required fields cannot be
/// nulled.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivityRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub date: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default)]
    pub image_urls: Patch<Vec<String>>,
}

impl UpdateActivityRequest {
    /// Validate the supplied fields into a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NoFields` when nothing would change, or the
    /// first failing field rule.
    pub fn validate(self) -> Result<ActivityChanges, ValidationError> {
        let changes = ActivityChanges {
            title: required_patch(self.title, "title")?,
            category: required_patch(self.category, "category")?,
            date: match self.date {
                Patch::Absent => None,
                Patch::Null => return Err(ActivityError::MissingField("date").into()),
                Patch::Value(date) => Some(parse_date(Some(date.as_str()))?),
            },
            content: self
                .content
                .into_option()
                .map(|content| optional_text(content.as_deref())),
            image_urls: match self.image_urls {
                Patch::Absent => None,
                Patch::Null => Some(ImageUrls::default()),
                Patch::Value(urls) => Some(ImageUrls::parse(urls)?),
            },
        };

        if changes.is_empty() {
            return Err(ValidationError::NoFields);
        }
        Ok(changes)
    }
}

fn parse_date(value: Option<&str>) -> Result<ActivityDate, ActivityError> {
    match value.map(str::trim) {
        None | Some("") => Err(ActivityError::MissingField("date")),
        Some(date) => ActivityDate::parse(date),
    }
}

fn required_patch(
    value: Patch<String>,
    field: &'static str,
) -> Result<Option<String>, ActivityError> {
    match value {
        Patch::Absent => Ok(None),
        Patch::Null => Err(ActivityError::MissingField(field)),
        Patch::Value(text) => required_text(&text, field).map(Some),
    }
}
