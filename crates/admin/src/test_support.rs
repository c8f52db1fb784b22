//! Shared fixtures for router tests.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::{AdminConfig, allowed_origins};
use crate::db::memory::MemoryStore;
use crate::routes;
use crate::state::AppState;

pub const BASE_URL: &str = "https://hactor.club";
pub const ADMIN_USERNAME: &str = "root";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

pub fn config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: BASE_URL.to_string(),
        allowed_origins: allowed_origins(BASE_URL, Some("http://localhost:5173")),
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"),
        log_json: false,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}

/// The full router over an in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config(), store.clone());
        Self {
            store,
            router: routes::app(state),
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Provision the default admin and log in, returning the `Cookie` value.
    pub async fn login(&self) -> String {
        self.store.insert_admin(ADMIN_USERNAME, ADMIN_PASSWORD, true);
        let response = self
            .send(api(
                Method::POST,
                "/api/admin/login",
                None,
                Some(serde_json::json!({
                    "username": ADMIN_USERNAME,
                    "password": ADMIN_PASSWORD,
                })),
            ))
            .await;
        session_cookie_pair(&response).unwrap()
    }
}

/// Build a same-origin API request.
pub fn api(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    request(method, uri, Some(BASE_URL), cookie, body)
}

/// Build a request with full control over the `Origin` header.
pub fn request(
    method: Method,
    uri: &str,
    origin: Option<&str>,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// The raw `Set-Cookie` header, if any.
pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap().to_string())
}

/// `admin_session=<token>` from a `Set-Cookie` header.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    set_cookie(response)?
        .split(';')
        .next()
        .map(str::to_string)
        .filter(|pair| pair.starts_with("admin_session=") && pair.len() > "admin_session=".len())
}

pub fn cache_control(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::CACHE_CONTROL)
        .and_then(|value| value.to_str().ok())
}
