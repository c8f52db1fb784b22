//! Hactor site backend library.
//!
//! Session-authenticated admin API for activities and the member roster,
//! plus the public read-only feeds used by the marketing pages.
//!
//! # Security
//!
//! - Admin passwords are bcrypt hashes, provisioned through `hactor-cli`
//! - Sessions are opaque random tokens; only their SHA-256 is stored
//! - Mutating admin requests must carry an allow-listed `Origin`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;
