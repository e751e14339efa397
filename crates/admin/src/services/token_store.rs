//! Dropbox token persistence seam.
//!
//! Durable storage belongs to an external database collaborator; the tool
//! only needs a keyed put/get. [`TokenStore`] is the seam, and
//! [`InMemoryTokenStore`] is the in-process implementation used in
//! development and tests. Concurrent callbacks for the same shop are
//! last-write-wins; the flow never requires stronger consistency.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dtf_reseller_core::ShopDomain;

use crate::dropbox::DropboxToken;

/// Store for Dropbox tokens, keyed by shop domain.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Persist a token for a shop, replacing any existing token.
    async fn put(&self, shop: ShopDomain, token: DropboxToken);

    /// Fetch the token for a shop, if one is stored.
    async fn get(&self, shop: &ShopDomain) -> Option<DropboxToken>;
}

/// In-memory token store.
#[derive(Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<ShopDomain, DropboxToken>>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(&self, shop: ShopDomain, token: DropboxToken) {
        self.tokens.write().await.insert(shop, token);
    }

    async fn get(&self, shop: &ShopDomain) -> Option<DropboxToken> {
        self.tokens.read().await.get(shop).cloned()
    }
}
