//! HTTP route handlers for the admin tool.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health          - Health check
//!
//! # DTF tool (requires shop identity)
//! POST /app/dtf-tool    - Form endpoint: intent=calculate | save_quote
//!
//! # Dropbox OAuth
//! GET  /dropbox/auth    - No code: redirect to Dropbox authorization
//!                         Code present: exchange code, persist token
//! ```

pub mod dropbox_auth;
pub mod dtf_tool;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Build the full application router.
///
/// Tracing and Sentry layers are applied by the binary; integration tests
/// drive this router directly.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/app/dtf-tool", post(dtf_tool::action))
        .route("/dropbox/auth", get(dropbox_auth::authorize))
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
