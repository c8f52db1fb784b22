//! Activity value types.
//!
//! An activity's `year` and `dateLabel` are never stored independently of its
//! date: both are derived from [`ActivityDate`], so any code path that changes
//! the date necessarily carries the matching year and label with it.

use core::fmt;
use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use url::Url;

/// Errors that can occur when validating activity input.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityError {
    /// A required text field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// The date is not a real calendar date in `YYYY-MM-DD` form.
    #[error("date must be a valid calendar date in YYYY-MM-DD format (got '{0}')")]
    InvalidDate(String),
    /// The date's year is outside the supported range.
    #[error("year must be between {min} and {max} (got {year})")]
    YearOutOfRange {
        /// Parsed year.
        year: i32,
        /// Smallest accepted year.
        min: i32,
        /// Largest accepted year.
        max: i32,
    },
    /// An image URL is not an absolute http(s) URL.
    #[error("image URL must be an absolute http or https URL (got '{0}')")]
    InvalidImageUrl(String),
    /// Too many distinct image URLs.
    #[error("at most {max} image URLs are allowed")]
    TooManyImages {
        /// Maximum number of image URLs.
        max: usize,
    },
}

/// The canonical date of an activity.
///
/// ## Constraints
///
/// - Strict `YYYY-MM-DD`; the input must round-trip exactly, so `2025-2-3`
///   and `2025-02-30` are rejected
/// - Year in `[1900, 2100]`
///
/// ## Examples
///
/// ```
/// use hactor_core::ActivityDate;
///
/// let date = ActivityDate::parse("2026-03-01").unwrap();
/// assert_eq!(date.year(), 2026);
/// assert_eq!(date.label(), "Mar 01");
///
/// assert!(ActivityDate::parse("2026-02-30").is_err());
/// assert!(ActivityDate::parse("1899-12-31").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityDate(NaiveDate);

impl ActivityDate {
    /// Smallest accepted year.
    pub const MIN_YEAR: i32 = 1900;
    /// Largest accepted year.
    pub const MAX_YEAR: i32 = 2100;

    const FORMAT: &'static str = "%Y-%m-%d";
    const LABEL_FORMAT: &'static str = "%b %d";

    /// Parse an `ActivityDate` from a `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidDate`] if the input is not a calendar
    /// date in strict form, or [`ActivityError::YearOutOfRange`] if the year
    /// is outside `[1900, 2100]`.
    pub fn parse(s: &str) -> Result<Self, ActivityError> {
        let date = NaiveDate::parse_from_str(s, Self::FORMAT)
            .map_err(|_| ActivityError::InvalidDate(s.to_owned()))?;

        // chrono accepts unpadded and signed fields; only the canonical form is valid here.
        if date.format(Self::FORMAT).to_string() != s {
            return Err(ActivityError::InvalidDate(s.to_owned()));
        }

        Self::from_date(date)
    }

    /// Wrap an already-parsed date, enforcing the year range.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::YearOutOfRange`] if the year is outside
    /// `[1900, 2100]`.
    pub fn from_date(date: NaiveDate) -> Result<Self, ActivityError> {
        let year = date.year();
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(ActivityError::YearOutOfRange {
                year,
                min: Self::MIN_YEAR,
                max: Self::MAX_YEAR,
            });
        }
        Ok(Self(date))
    }

    /// Returns the underlying date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Returns the calendar year of the date.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the short display label, e.g. `"Dec 28"`.
    ///
    /// Always English month abbreviations, independent of locale.
    #[must_use]
    pub fn label(&self) -> String {
        self.0.format(Self::LABEL_FORMAT).to_string()
    }
}

impl fmt::Display for ActivityDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl std::str::FromStr for ActivityDate {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ActivityDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An ordered, duplicate-free list of activity image URLs.
///
/// Entries are trimmed, must be absolute `http`/`https` URLs with a host,
/// and later duplicates are dropped. More than [`ImageUrls::MAX_COUNT`]
/// distinct entries is an error, never a silent truncation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageUrls(Vec<String>);

impl ImageUrls {
    /// Maximum number of image URLs per activity.
    pub const MAX_COUNT: usize = 24;

    /// Validate and normalize a list of image URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::InvalidImageUrl`] for the first entry that is
    /// not an absolute http(s) URL, or [`ActivityError::TooManyImages`] if
    /// more than 24 distinct URLs remain.
    pub fn parse<I, S>(entries: I) -> Result<Self, ActivityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for entry in entries {
            let value = entry.as_ref().trim();
            validate_image_url(value)?;

            if seen.insert(value.to_owned()) {
                urls.push(value.to_owned());
                if urls.len() > Self::MAX_COUNT {
                    return Err(ActivityError::TooManyImages {
                        max: Self::MAX_COUNT,
                    });
                }
            }
        }

        Ok(Self(urls))
    }

    /// Returns the URLs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Consumes the list and returns the URLs.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }

    /// Returns the number of URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no URLs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn validate_image_url(value: &str) -> Result<(), ActivityError> {
    let invalid = || ActivityError::InvalidImageUrl(value.to_owned());
    let url = Url::parse(value).map_err(|_| invalid())?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    Ok(())
}

/// Trim a required text field, rejecting blank input.
///
/// # Errors
///
/// Returns [`ActivityError::MissingField`] naming `field` if the trimmed value
/// is empty.
pub fn required_text(value: &str, field: &'static str) -> Result<String, ActivityError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ActivityError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Trim optional free text; blank becomes `None`.
#[must_use]
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
