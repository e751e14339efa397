//! Dropbox OAuth route handlers.
//!
//! One endpoint drives the whole connect flow, dispatched on the presence
//! of the `code` query parameter:
//!
//! - No code: mint a signed state for the merchant's shop and redirect to
//!   Dropbox's authorization page. The merchant opens this in a popup.
//! - Code present: verify the state, exchange the code for tokens, persist
//!   them keyed by the shop recovered from the state, and render a page
//!   whose script notifies the opener window and closes the popup.
//!
//! Failures render an error page and end the flow; the merchant restarts
//! authorization manually. Nothing is persisted on a failure path.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::error::AppError;
use crate::middleware::RequireShop;
use crate::state::AppState;

/// Query parameters on the Dropbox OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// Signed state correlator minted when the flow started.
    pub state: Option<String>,
    /// Error code if the merchant denied authorization.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Popup page rendered after a successful connection.
///
/// The embedded script notifies the opener window and closes the popup;
/// when there is no opener it falls back to the tool's main page. That is
/// the only channel the detached popup has back to the initiating view.
#[derive(Template, WebTemplate)]
#[template(path = "dropbox/connected.html")]
pub struct ConnectedTemplate;

/// Popup page rendered when the flow fails.
#[derive(Template, WebTemplate)]
#[template(path = "dropbox/error.html")]
pub struct ConnectionFailedTemplate {
    pub message: String,
}

/// Handle the Dropbox OAuth endpoint.
///
/// # Route
///
/// `GET /dropbox/auth`
pub async fn authorize(
    shop: Result<RequireShop, AppError>,
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Denied authorization never carries a code; report and stop
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!(error = %error, description = %description, "Dropbox authorization denied");
        return ConnectionFailedTemplate {
            message: "Dropbox authorization was denied.".to_string(),
        }
        .into_response();
    }

    match query.code {
        None => start_authorization(shop, &state),
        Some(code) => handle_callback(&state, &code, query.state.as_deref()).await,
    }
}

/// Begin the flow: mint a state for the authenticated shop and redirect.
fn start_authorization(shop: Result<RequireShop, AppError>, state: &AppState) -> Response {
    let Ok(RequireShop(shop)) = shop else {
        return ConnectionFailedTemplate {
            message: "No authenticated shop for this request.".to_string(),
        }
        .into_response();
    };

    let oauth_state = state.signer().sign(&shop);
    let redirect_uri = state.config().dropbox_redirect_uri();
    let auth_url = state.dropbox().authorization_url(&redirect_uri, &oauth_state);

    tracing::info!(shop = %shop, "Starting Dropbox authorization");
    Redirect::to(&auth_url).into_response()
}

/// Finish the flow: verify state, exchange the code, persist the token.
async fn handle_callback(state: &AppState, code: &str, raw_state: Option<&str>) -> Response {
    let failed = |message: &str| {
        ConnectionFailedTemplate {
            message: message.to_string(),
        }
        .into_response()
    };

    let Some(raw_state) = raw_state else {
        tracing::warn!("Dropbox callback missing state parameter");
        return failed("Missing state parameter.");
    };

    let verified = match state.signer().verify(raw_state) {
        Ok(verified) => verified,
        Err(e) => {
            tracing::warn!(error = %e, "Dropbox callback state rejected");
            return failed("Invalid or expired authorization state.");
        }
    };

    // Single use: a replayed state must not trigger a second exchange
    if !state.consume_state_nonce(&verified.nonce).await {
        tracing::warn!(shop = %verified.shop, "Dropbox callback state replayed");
        return failed("This authorization link was already used.");
    }

    let redirect_uri = state.config().dropbox_redirect_uri();
    let token = match state.dropbox().exchange_code(code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(shop = %verified.shop, error = %e, "Dropbox code exchange failed");
            return failed("Token exchange with Dropbox failed.");
        }
    };

    state.tokens().put(verified.shop.clone(), token).await;
    tracing::info!(shop = %verified.shop, "Dropbox connected");

    ConnectedTemplate.into_response()
}
