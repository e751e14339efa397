//! Business logic services for the admin tool.
//!
//! # Services
//!
//! - `oauth_state` - Signed, single-use, time-bounded OAuth state correlators
//! - `token_store` - Persistence seam for Dropbox tokens, keyed by shop

pub mod oauth_state;
pub mod token_store;

pub use oauth_state::{StateError, StateSigner, VerifiedState};
pub use token_store::{InMemoryTokenStore, TokenStore};
