//! Core types for Hactor.
//!
//! This module provides type-safe wrappers and validation rules for the
//! club's domain concepts.

pub mod activity;
pub mod field;
pub mod id;
pub mod member;
pub mod patch;

pub use activity::{ActivityDate, ActivityError, ImageUrls, optional_text, required_text};
pub use field::{
    DEFAULT_ACTIVITY_FIELDS, DefaultField, LEGACY_PWNABLE_CODE, PWNABLE_CODE, TagTone, tag_label,
};
pub use id::*;
pub use member::{DisplayName, MemberError, normalize_handle, parse_joined_at, unique_field_ids};
pub use patch::Patch;
