//! Admin tool configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ADMIN_BASE_URL` - Public URL for the admin tool (used to build the
//!   OAuth redirect URI)
//! - `OAUTH_STATE_SECRET` - HMAC key for signing OAuth state (min 32 chars,
//!   high entropy)
//! - `DROPBOX_APP_KEY` - Dropbox OAuth client ID
//! - `DROPBOX_APP_SECRET` - Dropbox OAuth client secret
//!
//! ## Optional
//! - `ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `ADMIN_PORT` - Listen port (default: 3001)
//! - `DTF_COST_PER_SQUARE_INCH` - Imprint cost per square inch (default: 0.50)
//! - `DROPBOX_AUTHORIZE_BASE` - Authorization host override (default:
//!   `https://www.dropbox.com`)
//! - `DROPBOX_API_BASE` - Token API host override (default:
//!   `https://api.dropboxapi.com`)
//! - `DROPBOX_CONTENT_BASE` - Content API host override (default:
//!   `https://content.dropboxapi.com`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use dtf_reseller_core::PricingConfig;

const MIN_STATE_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
///
/// These are raised at startup so a missing credential fails fast instead
/// of surfacing as a cryptic runtime failure mid-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Admin tool application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the admin tool
    pub base_url: String,
    /// HMAC key used to sign OAuth state correlators
    pub state_secret: SecretString,
    /// Dropbox OAuth application configuration
    pub dropbox: DropboxConfig,
    /// Quote pricing constants
    pub pricing: PricingConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Dropbox OAuth application configuration.
///
/// Implements `Debug` manually to redact the app secret. The host fields
/// exist so tests can point the client at a stub endpoint; production
/// deployments leave them at their defaults.
#[derive(Clone)]
pub struct DropboxConfig {
    /// OAuth client ID (the Dropbox "app key")
    pub app_key: String,
    /// OAuth client secret
    pub app_secret: SecretString,
    /// Base URL of the user-facing authorization endpoint
    pub authorize_base: String,
    /// Base URL of the token API
    pub api_base: String,
    /// Base URL of the file content API
    pub content_base: String,
}

impl std::fmt::Debug for DropboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DropboxConfig")
            .field("app_key", &self.app_key)
            .field("app_secret", &"[REDACTED]")
            .field("authorize_base", &self.authorize_base)
            .field("api_base", &self.api_base)
            .field("content_base", &self.content_base)
            .finish()
    }
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ADMIN_PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("ADMIN_BASE_URL")?;
        let state_secret = get_validated_secret("OAUTH_STATE_SECRET")?;
        validate_state_secret(&state_secret, "OAUTH_STATE_SECRET")?;

        let dropbox = DropboxConfig::from_env()?;
        let pricing = pricing_from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            state_secret,
            dropbox,
            pricing,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the OAuth redirect URI for the Dropbox callback.
    ///
    /// Must match the redirect URI registered with the Dropbox app and must
    /// be identical in the authorization request and the code exchange.
    #[must_use]
    pub fn dropbox_redirect_uri(&self) -> String {
        format!("{}/dropbox/auth", self.base_url.trim_end_matches('/'))
    }
}

impl DropboxConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app_key: get_required_env("DROPBOX_APP_KEY")?,
            app_secret: get_validated_secret("DROPBOX_APP_SECRET")?,
            authorize_base: get_env_or_default("DROPBOX_AUTHORIZE_BASE", "https://www.dropbox.com"),
            api_base: get_env_or_default("DROPBOX_API_BASE", "https://api.dropboxapi.com"),
            content_base: get_env_or_default(
                "DROPBOX_CONTENT_BASE",
                "https://content.dropboxapi.com",
            ),
        })
    }
}

/// Load pricing constants from environment.
fn pricing_from_env() -> Result<PricingConfig, ConfigError> {
    match get_optional_env("DTF_COST_PER_SQUARE_INCH") {
        Some(raw) => {
            let cost = raw.parse::<Decimal>().map_err(|e| {
                ConfigError::InvalidEnvVar("DTF_COST_PER_SQUARE_INCH".to_string(), e.to_string())
            })?;
            if cost < Decimal::ZERO {
                return Err(ConfigError::InvalidEnvVar(
                    "DTF_COST_PER_SQUARE_INCH".to_string(),
                    "must not be negative".to_string(),
                ));
            }
            Ok(PricingConfig {
                cost_per_square_inch: cost,
            })
        }
        None => Ok(PricingConfig::default()),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the state-signing secret meets minimum length requirements.
fn validate_state_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_STATE_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_STATE_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
