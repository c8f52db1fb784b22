//! Hactor Core - Shared domain types.
//!
//! This crate provides the types used across all Hactor components:
//! - `admin` - Site backend: admin console API and public read endpoints
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! database access, no HTTP. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, activity dates and image lists, member names,
//!   activity field catalogue, partial-update fields

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
