//! Signed OAuth state correlators.
//!
//! The OAuth `state` parameter ties an inbound callback to the shop that
//! started the authorization flow. Passing the shop domain through raw
//! would let anyone forge a callback for an arbitrary shop, so the state
//! is an HMAC-SHA256-signed, time-bounded payload:
//!
//! ```text
//! base64url(shop|issued_at|nonce) . base64url(hmac_sha256(payload))
//! ```
//!
//! Verification checks the signature and a 10-minute lifetime. Single use
//! is enforced by the caller via the nonce replay cache in `AppState`;
//! the payload nonce exists for exactly that purpose.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;

use dtf_reseller_core::{ShopDomain, ShopDomainError};

type HmacSha256 = Hmac<Sha256>;

/// How long a minted state remains valid.
pub const STATE_LIFETIME_SECS: i64 = 600;

/// Errors that can occur when verifying a state correlator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The state string is not in the expected two-part format.
    #[error("malformed state parameter")]
    Malformed,
    /// The signature does not match the payload.
    #[error("state signature mismatch")]
    BadSignature,
    /// The state was issued more than [`STATE_LIFETIME_SECS`] ago.
    #[error("state expired")]
    Expired,
    /// The state nonce was already consumed by an earlier callback.
    #[error("state already used")]
    Replayed,
    /// The shop embedded in the state is not a valid shop domain.
    #[error("invalid shop in state: {0}")]
    InvalidShop(#[from] ShopDomainError),
}

/// A state correlator that passed signature and lifetime checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedState {
    /// The shop that started the authorization flow.
    pub shop: ShopDomain,
    /// Unique nonce, consumed once by the replay cache.
    pub nonce: String,
    /// Unix timestamp when the state was minted.
    pub issued_at: i64,
}

/// Mints and verifies signed OAuth state correlators.
#[derive(Clone)]
pub struct StateSigner {
    key: Vec<u8>,
}

impl StateSigner {
    /// Create a signer from the configured state secret.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        Self {
            key: secret.expose_secret().as_bytes().to_vec(),
        }
    }

    /// Mint a signed state for an outbound authorization redirect.
    #[must_use]
    pub fn sign(&self, shop: &ShopDomain) -> String {
        self.sign_at(shop, Utc::now().timestamp())
    }

    /// Verify an inbound state and recover the shop it was minted for.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] if the state is malformed, the signature
    /// does not match, the lifetime has elapsed, or the embedded shop is
    /// not a valid domain.
    pub fn verify(&self, state: &str) -> Result<VerifiedState, StateError> {
        self.verify_at(state, Utc::now().timestamp())
    }

    fn sign_at(&self, shop: &ShopDomain, issued_at: i64) -> String {
        let mut nonce_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = hex::encode(nonce_bytes);

        let payload = format!("{shop}|{issued_at}|{nonce}");
        let signature = self.mac(payload.as_bytes());

        format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            URL_SAFE_NO_PAD.encode(signature)
        )
    }

    fn verify_at(&self, state: &str, now: i64) -> Result<VerifiedState, StateError> {
        let (payload_b64, signature_b64) = state.split_once('.').ok_or(StateError::Malformed)?;

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| StateError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| StateError::Malformed)?;

        // Constant-time signature check
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| StateError::BadSignature)?;

        let payload = String::from_utf8(payload).map_err(|_| StateError::Malformed)?;
        let mut parts = payload.splitn(3, '|');
        let shop_raw = parts.next().ok_or(StateError::Malformed)?;
        let issued_at = parts
            .next()
            .and_then(|s| s.parse::<i64>().ok())
            .ok_or(StateError::Malformed)?;
        let nonce = parts.next().ok_or(StateError::Malformed)?.to_string();

        if now - issued_at > STATE_LIFETIME_SECS {
            return Err(StateError::Expired);
        }

        let shop = ShopDomain::parse(shop_raw)?;

        Ok(VerifiedState {
            shop,
            nonce,
            issued_at,
        })
    }

    fn mac(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> StateSigner {
        StateSigner::new(&SecretString::from("0123456789abcdef0123456789abcdef"))
    }

    fn shop() -> ShopDomain {
        ShopDomain::parse("quote-shop.myshopify.com").unwrap()
    }

    #[test]
    fn test_sign_verify_round_trip() {
        let signer = signer();
        let state = signer.sign(&shop());

        let verified = signer.verify(&state).unwrap();
        assert_eq!(verified.shop, shop());
        assert_eq!(verified.nonce.len(), 32);
    }

    #[test]
    fn test_states_are_unique() {
        let signer = signer();
        // Nonce makes every mint distinct even for the same shop
        assert_ne!(signer.sign(&shop()), signer.sign(&shop()));
    }

    #[test]
    fn test_rejects_tampered_payload() {
        let signer = signer();
        let state = signer.sign(&shop());
        let (_, signature) = state.split_once('.').unwrap();

        let forged_payload =
            URL_SAFE_NO_PAD.encode(format!("evil.myshopify.com|{}|deadbeef", Utc::now().timestamp()));
        let forged = format!("{forged_payload}.{signature}");

        assert_eq!(signer.verify(&forged), Err(StateError::BadSignature));
    }

    #[test]
    fn test_rejects_wrong_key() {
        let state = signer().sign(&shop());
        let other = StateSigner::new(&SecretString::from("fedcba9876543210fedcba9876543210"));

        assert_eq!(other.verify(&state), Err(StateError::BadSignature));
    }

    #[test]
    fn test_rejects_expired() {
        let signer = signer();
        let state = signer.sign_at(&shop(), Utc::now().timestamp() - STATE_LIFETIME_SECS - 1);

        assert_eq!(signer.verify(&state), Err(StateError::Expired));
    }

    #[test]
    fn test_rejects_malformed() {
        let signer = signer();
        assert_eq!(signer.verify("no-dot-here"), Err(StateError::Malformed));
        assert_eq!(signer.verify("not!base64.alsonot!"), Err(StateError::Malformed));
        assert_eq!(signer.verify(""), Err(StateError::Malformed));
    }

    #[test]
    fn test_raw_shop_domain_is_not_accepted() {
        // The legacy scheme used the bare shop domain as state; it must fail
        let signer = signer();
        assert!(signer.verify("quote-shop.myshopify.com").is_err());
    }
}
