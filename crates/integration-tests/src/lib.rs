//! End-to-end tests for the Hactor site backend.
//!
//! Every test is `#[ignore]`d: they need a migrated database, a running
//! server and a provisioned admin.
//!
//! # Running Tests
//!
//! ```bash
//! hactor-cli migrate
//! echo 'correct horse battery' | hactor-cli admin create -u e2e
//! cargo run -p hactor-admin &
//!
//! HACTOR_TEST_USERNAME=e2e HACTOR_TEST_PASSWORD='correct horse battery' \
//!     cargo test -p hactor-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `HACTOR_TEST_BASE_URL` - Server under test (default: `http://localhost:3000`).
//!   Must match the server's `HACTOR_BASE_URL` origin so the origin guard passes.
//! - `HACTOR_TEST_USERNAME`, `HACTOR_TEST_PASSWORD` - Admin credentials

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("HACTOR_TEST_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string())
        .trim_end_matches('/')
        .to_string()
}

/// A cookie-keeping client that sends the site's own `Origin`.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::with_origin(&base_url())
    }

    /// A context that claims to come from `origin`.
    #[must_use]
    pub fn with_origin(origin: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ORIGIN,
            HeaderValue::from_str(origin).expect("origin is a valid header value"),
        );

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url(),
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in with the credentials from the environment.
    pub async fn login(&self) -> Response {
        let username = std::env::var("HACTOR_TEST_USERNAME").expect("HACTOR_TEST_USERNAME not set");
        let password = std::env::var("HACTOR_TEST_PASSWORD").expect("HACTOR_TEST_PASSWORD not set");

        self.client
            .post(self.url("/api/admin/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to send login request")
    }

    /// Log in and assert success.
    pub async fn authenticated() -> Self {
        let ctx = Self::new();
        let resp = ctx.login().await;
        assert_eq!(resp.status(), StatusCode::OK, "login failed");
        ctx
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a JSON body.
pub async fn json_body(resp: Response) -> Value {
    resp.json().await.expect("Failed to parse JSON body")
}
