//! Request payload validation.
//!
//! Each endpoint deserializes a loose request struct, then converts it into
//! a validated model with `validate()`. Nothing reaches the store unchecked.

pub mod activities;
pub mod members;

use thiserror::Error;

use hactor_core::{ActivityError, MemberError};

pub use activities::{CreateActivityRequest, UpdateActivityRequest};
pub use members::UpdateMemberRequest;

/// Errors raised while validating a request payload.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A partial update carried no recognised field.
    #[error("No fields to update")]
    NoFields,

    #[error(transparent)]
    Activity(#[from] ActivityError),

    #[error(transparent)]
    Member(#[from] MemberError),
}
