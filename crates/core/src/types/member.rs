//! Member roster value types.

use core::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::id::ActivityFieldId;

/// Errors that can occur when validating member input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    /// The display name is blank.
    #[error("display name is required")]
    EmptyDisplayName,
    /// The join date is neither `YYYY-MM-DD` nor an RFC 3339 timestamp.
    #[error("discordJoinedAt must be a YYYY-MM-DD date or RFC 3339 timestamp (got '{0}')")]
    InvalidJoinedAt(String),
}

/// A member's display name: trimmed and never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse a `DisplayName`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`MemberError::EmptyDisplayName`] if nothing remains after
    /// trimming.
    pub fn parse(s: &str) -> Result<Self, MemberError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(MemberError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the display name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `DisplayName` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize an external handle: blank or missing means unset.
#[must_use]
pub fn normalize_handle(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

/// Deduplicate field IDs, keeping the first occurrence of each.
#[must_use]
pub fn unique_field_ids(ids: &[i32]) -> Vec<ActivityFieldId> {
    let mut unique: Vec<ActivityFieldId> = Vec::with_capacity(ids.len());
    for &id in ids {
        let id = ActivityFieldId::new(id);
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// Parse a member join date.
///
/// Accepts an RFC 3339 timestamp or a plain `YYYY-MM-DD` date (midnight UTC).
///
/// # Errors
///
/// Returns [`MemberError::InvalidJoinedAt`] for anything else.
pub fn parse_joined_at(s: &str) -> Result<DateTime<Utc>, MemberError> {
    let value = s.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .filter(|date| date.format("%Y-%m-%d").to_string() == value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| MemberError::InvalidJoinedAt(s.to_owned()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn test_display_name_trims() {
        let name = DisplayName::parse("  Alice ").unwrap();
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_display_name_rejects_blank() {
        assert_eq!(DisplayName::parse(""), Err(MemberError::EmptyDisplayName));
        assert_eq!(DisplayName::parse(" \t "), Err(MemberError::EmptyDisplayName));
    }

    #[test]
    fn test_normalize_handle() {
        assert_eq!(normalize_handle(Some(" alice ")), Some("alice".to_owned()));
        assert_eq!(normalize_handle(Some("")), None);
        assert_eq!(normalize_handle(Some("   ")), None);
        assert_eq!(normalize_handle(None), None);
    }

    #[test]
    fn test_unique_field_ids() {
        let ids = unique_field_ids(&[3, 3, 5]);
        assert_eq!(ids, vec![ActivityFieldId::new(3), ActivityFieldId::new(5)]);

        let ids = unique_field_ids(&[5, 1, 5, 1, 2]);
        let raw: Vec<i32> = ids.into_iter().map(i32::from).collect();
        assert_eq!(raw, vec![5, 1, 2]);

        assert!(unique_field_ids(&[]).is_empty());
    }

    #[test]
    fn test_parse_joined_at_date() {
        let ts = parse_joined_at("2024-09-01").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 9, 1));
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn test_parse_joined_at_rfc3339() {
        let ts = parse_joined_at("2024-09-01T12:30:00+09:00").unwrap();
        assert_eq!(ts.hour(), 3);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_parse_joined_at_invalid() {
        assert!(matches!(
            parse_joined_at("yesterday"),
            Err(MemberError::InvalidJoinedAt(_))
        ));
        assert!(parse_joined_at("2024-02-30").is_err());
        assert!(parse_joined_at("").is_err());
    }
}
