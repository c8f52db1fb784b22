//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `HACTOR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `HACTOR_BASE_URL` - Public URL of the site; its origin is always allowed
//!
//! ## Optional
//! - `HACTOR_HOST` - Bind address (default: 127.0.0.1)
//! - `HACTOR_PORT` - Listen port (default: 3000)
//! - `ADMIN_ALLOWED_ORIGINS` - Extra comma-separated origins allowed to call
//!   mutating admin endpoints
//! - `HACTOR_STATIC_DIR` - Static root; console pages live in its `admin/`
//!   directory (default: crates/admin/static)
//! - `HACTOR_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`
//!
//! ## Optional (TLS)
//! - `HACTOR_TLS_CERT` - PEM-encoded certificate chain
//! - `HACTOR_TLS_KEY` - PEM-encoded private key

use std::collections::BTreeSet;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_STATIC_DIR: &str = "crates/admin/static";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the site
    pub base_url: String,
    /// Serialized origins (`scheme://host[:port]`) allowed to mutate admin data
    pub allowed_origins: BTreeSet<String>,
    /// Directory served under `/admin`
    pub static_dir: PathBuf,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// TLS configuration for HTTPS (optional)
    pub tls: Option<TlsConfig>,
}

/// TLS configuration for HTTPS.
#[derive(Clone)]
pub struct TlsConfig {
    /// PEM-encoded certificate chain
    pub cert_pem: String,
    /// PEM-encoded private key
    pub key_pem: SecretString,
}

impl std::fmt::Debug for TlsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsConfig")
            .field("cert_pem", &"[CERTIFICATE]")
            .field("key_pem", &"[REDACTED]")
            .finish()
    }
}

impl TlsConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let cert_pem = get_optional_env("HACTOR_TLS_CERT");
        let key_pem = get_optional_env("HACTOR_TLS_KEY");

        match (cert_pem, key_pem) {
            (Some(cert), Some(key)) => Ok(Some(Self {
                cert_pem: cert,
                key_pem: SecretString::from(key),
            })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::InvalidEnvVar(
                "HACTOR_TLS_*".to_string(),
                "Both HACTOR_TLS_CERT and HACTOR_TLS_KEY must be set together".to_string(),
            )),
        }
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("HACTOR_DATABASE_URL")?;
        let host = get_env_or_default("HACTOR_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HACTOR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("HACTOR_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("HACTOR_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("HACTOR_BASE_URL")?;
        let base_origin = origin_of(&base_url).ok_or_else(|| {
            ConfigError::InvalidEnvVar(
                "HACTOR_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            )
        })?;
        let allowed_origins = allowed_origins(
            &base_origin,
            get_optional_env("ADMIN_ALLOWED_ORIGINS").as_deref(),
        );

        let static_dir = PathBuf::from(get_env_or_default("HACTOR_STATIC_DIR", DEFAULT_STATIC_DIR));
        let log_json = get_optional_env("HACTOR_LOG_JSON").is_some();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);
        let tls = TlsConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            allowed_origins,
            static_dir,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
            tls,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies must carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Check a raw `Origin` header value against the allow-list.
    #[must_use]
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        origin_of(origin).is_some_and(|origin| self.allowed_origins.contains(&origin))
    }
}

/// Serialize the tuple origin of a URL, e.g. `https://hactor.club`.
///
/// Returns `None` for unparsable input and for opaque origins (`data:`,
/// `file:`, the literal `null`).
#[must_use]
pub fn origin_of(value: &str) -> Option<String> {
    let origin = Url::parse(value.trim()).ok()?.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Build the origin allow-list from the base origin plus a comma-separated
/// list of extra origins. Entries that don't parse are logged and dropped.
#[must_use]
pub fn allowed_origins(base_origin: &str, extra: Option<&str>) -> BTreeSet<String> {
    let mut origins = BTreeSet::from([base_origin.to_string()]);

    for entry in extra.unwrap_or_default().split(',').map(str::trim) {
        if entry.is_empty() {
            continue;
        }
        match origin_of(entry) {
            Some(origin) => {
                origins.insert(origin);
            }
            None => tracing::warn!(entry, "Ignoring invalid ADMIN_ALLOWED_ORIGINS entry"),
        }
    }

    origins
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
