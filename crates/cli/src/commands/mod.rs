//! Subcommand implementations.

pub mod admin;
pub mod fields;
pub mod migrate;

use secrecy::SecretString;

/// Environment variable holding the site database URL.
pub const DATABASE_URL_VAR: &str = "HACTOR_DATABASE_URL";

/// Read the database URL, falling back to the generic `DATABASE_URL`.
///
/// Loads `.env` first so local runs pick up the same settings as the server.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(SecretString::from)
}
