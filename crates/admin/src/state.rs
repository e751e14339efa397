//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::config::AdminConfig;
use crate::dropbox::DropboxClient;
use crate::services::oauth_state::{STATE_LIFETIME_SECS, StateSigner};
use crate::services::token_store::{InMemoryTokenStore, TokenStore};

/// Maximum number of outstanding OAuth states tracked for replay detection.
const USED_STATE_CAPACITY: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the Dropbox client, the state signer,
/// the token store, and the state replay cache.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    dropbox: DropboxClient,
    signer: StateSigner,
    tokens: Arc<dyn TokenStore>,
    used_states: Cache<String, ()>,
}

impl AppState {
    /// Create a new application state with the in-memory token store.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        Self::with_token_store(config, Arc::new(InMemoryTokenStore::new()))
    }

    /// Create a new application state with an explicit token store.
    ///
    /// The external database collaborator plugs in here.
    #[must_use]
    pub fn with_token_store(config: AdminConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let dropbox = DropboxClient::new(&config.dropbox);
        let signer = StateSigner::new(&config.state_secret);

        // Entries only need to live as long as the states they guard
        let used_states = Cache::builder()
            .max_capacity(USED_STATE_CAPACITY)
            .time_to_live(Duration::from_secs(STATE_LIFETIME_SECS.unsigned_abs()))
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                dropbox,
                signer,
                tokens,
                used_states,
            }),
        }
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the Dropbox client.
    #[must_use]
    pub fn dropbox(&self) -> &DropboxClient {
        &self.inner.dropbox
    }

    /// Get a reference to the OAuth state signer.
    #[must_use]
    pub fn signer(&self) -> &StateSigner {
        &self.inner.signer
    }

    /// Get a reference to the token store.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    /// Consume a state nonce, returning `true` the first time it is seen.
    ///
    /// A `false` return means an earlier callback already used this state.
    pub async fn consume_state_nonce(&self, nonce: &str) -> bool {
        self.inner
            .used_states
            .entry(nonce.to_string())
            .or_insert(())
            .await
            .is_fresh()
    }
}
