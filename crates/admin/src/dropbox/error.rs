//! Dropbox-related errors.

use thiserror::Error;

/// Errors that can occur when interacting with Dropbox.
#[derive(Debug, Error)]
pub enum DropboxError {
    /// HTTP request failed (network error, timeout, malformed body).
    #[error("Dropbox request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint returned a non-success status.
    #[error("Token exchange failed ({status}): {body}")]
    Exchange {
        /// HTTP status returned by the token endpoint.
        status: u16,
        /// Response body, for the error page and logs.
        body: String,
    },

    /// Content API returned a non-success status.
    #[error("Upload failed ({status}): {body}")]
    Upload {
        /// HTTP status returned by the content endpoint.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Failed to serialize an API argument.
    #[error("Dropbox API argument error: {0}")]
    Arg(#[from] serde_json::Error),
}
