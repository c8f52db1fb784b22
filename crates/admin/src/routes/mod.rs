//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                      - Liveness
//! GET    /health/ready                - Store ping
//!
//! # Admin API (origin check on every non-GET request)
//! POST   /api/admin/login             - Exchange credentials for a session cookie
//! POST   /api/admin/logout            - Drop the session
//! GET    /api/admin/session           - Current admin
//! GET    /api/admin/activities        - List activities
//! POST   /api/admin/activities        - Create activity
//! PATCH  /api/admin/activities/{id}   - Partial update
//! DELETE /api/admin/activities/{id}   - Delete
//! GET    /api/admin/members           - Roster and field catalogue
//! PATCH  /api/admin/members/{id}      - Partial update, tag replacement
//! DELETE /api/admin/members/{id}      - Delete
//!
//! # Public
//! GET    /api/activities              - Activity feed
//! GET    /api/members/marquee         - Member marquee
//!
//! # Console pages (static)
//! GET    /admin                       - Login page
//! GET    /admin/*                     - Console, session required
//! ```

pub mod activities;
pub mod auth;
pub mod extract;
pub mod health;
pub mod members;
pub mod public;


use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::{console_gatekeeper, require_same_origin};
use crate::state::AppState;

/// Admin API router, mounted under `/api/admin`.
fn admin_api(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::session))
        .route(
            "/activities",
            get(activities::index).post(activities::create),
        )
        .route(
            "/activities/{id}",
            patch(activities::update).delete(activities::destroy),
        )
        .route("/members", get(members::index))
        .route(
            "/members/{id}",
            patch(members::update).delete(members::destroy),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_same_origin,
        ))
}

/// Build the full application router.
///
/// Console assets live under `<static_dir>/admin/` and are served with the
/// full request path, so directory redirects stay inside `/admin/`.
pub fn app(state: AppState) -> Router {
    let static_dir = &state.config().static_dir;
    let login_page = ServeFile::new(static_dir.join("admin").join("index.html"));
    let console = ServeDir::new(static_dir);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api/admin", admin_api(&state))
        .route("/api/activities", get(public::activities))
        .route("/api/members/marquee", get(public::marquee))
        .route_service("/admin", login_page)
        .fallback_service(console)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            console_gatekeeper,
        ))
        .with_state(state)
}
