//! Dropbox OAuth and file API client.
//!
//! Handles the authorization-code flow used to connect a shop's Dropbox
//! account, and the single content-API call the tool needs (uploading a
//! saved quote).
//!
//! # OAuth Flow
//!
//! 1. Generate an authorization URL with `authorization_url()`
//! 2. Redirect the merchant to Dropbox's consent page (opened in a popup)
//! 3. Dropbox redirects back to `/dropbox/auth` with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Persist the token keyed by shop; later uploads use `upload()`
//!
//! All endpoints come from the injected [`DropboxConfig`]; the client never
//! reads the process environment.

mod error;
mod types;

pub use error::DropboxError;
pub use types::{DropboxToken, FileMetadata};

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::config::DropboxConfig;
use types::TokenResponse;

/// Client for the Dropbox OAuth and content APIs.
#[derive(Clone)]
pub struct DropboxClient {
    inner: Arc<DropboxClientInner>,
}

struct DropboxClientInner {
    client: reqwest::Client,
    app_key: String,
    app_secret: String,
    authorize_base: String,
    api_base: String,
    content_base: String,
}

impl DropboxClient {
    /// Create a new Dropbox client from configuration.
    #[must_use]
    pub fn new(config: &DropboxConfig) -> Self {
        Self {
            inner: Arc::new(DropboxClientInner {
                client: reqwest::Client::new(),
                app_key: config.app_key.clone(),
                app_secret: config.app_secret.expose_secret().to_string(),
                authorize_base: config.authorize_base.clone(),
                api_base: config.api_base.clone(),
                content_base: config.content_base.clone(),
            }),
        }
    }

    /// Get the OAuth client ID (safe to expose to the browser).
    #[must_use]
    pub fn app_key(&self) -> &str {
        &self.inner.app_key
    }

    // ─────────────────────────────────────────────────────────────────────────
    // OAuth Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate the authorization URL for connecting a Dropbox account.
    ///
    /// Redirect the merchant to this URL to begin the OAuth flow.
    /// `token_access_type=offline` asks Dropbox for a refresh token so the
    /// connection outlives the short-lived access token.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL Dropbox redirects back to
    /// * `state` - Signed correlator tying the callback to the shop that
    ///   started the flow
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> String {
        format!(
            "{}/oauth2/authorize?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            state={}&\
            token_access_type=offline",
            self.inner.authorize_base,
            urlencoding::encode(&self.inner.app_key),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
        )
    }

    /// Exchange an authorization code for access and refresh tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - The authorization code from the OAuth callback
    /// * `redirect_uri` - The same redirect URI used in the authorization
    ///   request
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the token endpoint returns a
    /// non-success status, or the response body is malformed. There is no
    /// retry; the merchant restarts the flow manually.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<DropboxToken, DropboxError> {
        let url = format!("{}/oauth2/token", self.inner.api_base);

        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.inner.app_key),
            ("client_secret", &self.inner.app_secret),
            ("redirect_uri", redirect_uri),
        ];

        let response = self.inner.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DropboxError::Exchange { status, body });
        }

        let token_response: TokenResponse = response.json().await?;
        Ok(token_response.into())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content API
    // ─────────────────────────────────────────────────────────────────────────

    /// Upload a file to the connected Dropbox account.
    ///
    /// Overwrites any existing file at `path`. Used by the `save_quote`
    /// intent to write the quote JSON into the shop's app folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the content API returns a
    /// non-success status.
    pub async fn upload(
        &self,
        access_token: &str,
        path: &str,
        contents: Vec<u8>,
    ) -> Result<FileMetadata, DropboxError> {
        let url = format!("{}/2/files/upload", self.inner.content_base);

        let arg = serde_json::json!({
            "path": path,
            "mode": "overwrite",
            "mute": true,
        });

        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(access_token)
            .header("Dropbox-API-Arg", serde_json::to_string(&arg)?)
            .header("Content-Type", "application/octet-stream")
            .body(contents)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DropboxError::Upload { status, body });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use url::Url;

    fn test_client() -> DropboxClient {
        DropboxClient::new(&DropboxConfig {
            app_key: "test-app-key".to_string(),
            app_secret: SecretString::from("test-app-secret"),
            authorize_base: "https://www.dropbox.com".to_string(),
            api_base: "https://api.dropboxapi.com".to_string(),
            content_base: "https://content.dropboxapi.com".to_string(),
        })
    }

    #[test]
    fn test_authorization_url_shape() {
        let url = test_client()
            .authorization_url("http://localhost:3001/dropbox/auth", "signed-state-value");
        let parsed = Url::parse(&url).unwrap();

        assert_eq!(parsed.host_str(), Some("www.dropbox.com"));
        assert_eq!(parsed.path(), "/oauth2/authorize");

        let params: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(params.contains(&("client_id".to_string(), "test-app-key".to_string())));
        assert!(params.contains(&("response_type".to_string(), "code".to_string())));
        assert!(params.contains(&(
            "redirect_uri".to_string(),
            "http://localhost:3001/dropbox/auth".to_string()
        )));
        assert!(params.contains(&("state".to_string(), "signed-state-value".to_string())));
        assert!(params.contains(&("token_access_type".to_string(), "offline".to_string())));
    }

    #[test]
    fn test_authorization_url_encodes_state() {
        let url = test_client().authorization_url("http://localhost/cb", "a b&c");
        assert!(url.contains("state=a%20b%26c"));
    }
}
