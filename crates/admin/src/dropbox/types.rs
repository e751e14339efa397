//! Types for Dropbox OAuth and file API responses.

use chrono::Utc;
use secrecy::SecretString;
use serde::Deserialize;

/// Dropbox tokens obtained via the authorization-code exchange.
///
/// Owned by the shop that completed the OAuth flow and persisted keyed by
/// its shop domain. Implements `Debug` manually to redact both tokens.
#[derive(Clone)]
pub struct DropboxToken {
    /// Short-lived bearer token for API requests.
    pub access_token: SecretString,
    /// Long-lived token for obtaining new access tokens
    /// (granted because we request `token_access_type=offline`).
    pub refresh_token: SecretString,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Unix timestamp when the token was obtained.
    pub obtained_at: i64,
}

impl std::fmt::Debug for DropboxToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxToken")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("obtained_at", &self.obtained_at)
            .finish()
    }
}

impl DropboxToken {
    /// Check if the access token is expired (with 60s buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        let expires_at = self.obtained_at + self.expires_in;
        now >= (expires_at - 60)
    }
}

/// Raw token response from the Dropbox OAuth endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

impl From<TokenResponse> for DropboxToken {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(response.access_token),
            refresh_token: SecretString::from(response.refresh_token),
            expires_in: response.expires_in,
            obtained_at: Utc::now().timestamp(),
        }
    }
}

/// Metadata returned by the content API after an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct FileMetadata {
    /// File name including extension.
    pub name: String,
    /// Full lowercased path of the uploaded file.
    pub path_lower: Option<String>,
}
