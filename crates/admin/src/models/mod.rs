//! Domain models for the site backend.

pub mod activity;
pub mod admin;
pub mod member;
pub mod session;

pub use activity::{Activity, ActivityChanges, NewActivity};
pub use admin::{Admin, NewAdmin};
pub use member::{
    ActivityField, MarqueeMember, MarqueeTag, Member, MemberChanges, MemberField,
};
pub use session::{CurrentAdmin, NewSession, SessionOwner, SessionRecord};
