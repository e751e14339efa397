//! Integration tests for the DTF Reseller tool.
//!
//! The tests drive the admin router in-process via `tower::ServiceExt`
//! and point the Dropbox client at a local stub token endpoint, so no
//! network access or external services are required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p dtf-reseller-integration-tests
//! ```

use std::net::SocketAddr;

use axum::{Json, Router, http::StatusCode, routing::post};
use secrecy::SecretString;

use dtf_reseller_admin::config::{AdminConfig, DropboxConfig};
use dtf_reseller_core::PricingConfig;

/// Shop domain used throughout the tests.
pub const TEST_SHOP: &str = "quote-shop.myshopify.com";

/// State-signing secret shared between test config and assertions.
pub const TEST_STATE_SECRET: &str = "0123456789abcdef0123456789abcdef";

/// Header the upstream session authenticator would set.
pub const SHOP_HEADER: &str = "x-shopify-shop-domain";

/// Build an [`AdminConfig`] pointing the Dropbox client at `api_base`.
#[must_use]
pub fn test_config(api_base: &str) -> AdminConfig {
    AdminConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "http://localhost:3001".to_string(),
        state_secret: SecretString::from(TEST_STATE_SECRET),
        dropbox: DropboxConfig {
            app_key: "test-app-key".to_string(),
            app_secret: SecretString::from("test-app-secret"),
            authorize_base: "https://www.dropbox.com".to_string(),
            api_base: api_base.to_string(),
            content_base: api_base.to_string(),
        },
        pricing: PricingConfig::default(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Spawn a stub Dropbox token endpoint returning a fixed response.
///
/// Returns the base URL to use as `api_base` in the test config.
pub async fn spawn_token_endpoint(status: StatusCode, body: serde_json::Value) -> String {
    let app = Router::new().route(
        "/oauth2/token",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr: SocketAddr = listener.local_addr().expect("stub local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    format!("http://{addr}")
}

/// A token response body the stub endpoint can return on success.
#[must_use]
pub fn token_response_body() -> serde_json::Value {
    serde_json::json!({
        "access_token": "sl.test-access-token",
        "refresh_token": "rt.test-refresh-token",
        "expires_in": 14400,
        "token_type": "bearer",
    })
}
