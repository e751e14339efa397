//! Shop domain type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ShopDomain`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ShopDomainError {
    /// The input string is empty.
    #[error("shop domain cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("shop domain must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character not valid in a hostname.
    #[error("shop domain contains an invalid character: {0:?}")]
    InvalidCharacter(char),
}

/// A merchant shop domain, e.g. `your-store.myshopify.com`.
///
/// The shop domain is the tenant key throughout the tool: quotes are
/// computed for a shop, and Dropbox tokens are stored keyed by a shop.
/// It is supplied by the admin-session authenticator, so validation here
/// is defensive hostname shape checking, not ownership proof.
///
/// ## Examples
///
/// ```
/// use dtf_reseller_core::ShopDomain;
///
/// assert!(ShopDomain::parse("your-store.myshopify.com").is_ok());
/// assert!(ShopDomain::parse("").is_err());
/// assert!(ShopDomain::parse("bad domain").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ShopDomain(String);

impl ShopDomain {
    /// Maximum length of a hostname (RFC 1035).
    pub const MAX_LENGTH: usize = 253;

    /// Parse a `ShopDomain` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 253 characters,
    /// or contains characters not valid in a hostname.
    pub fn parse(s: &str) -> Result<Self, ShopDomainError> {
        if s.is_empty() {
            return Err(ShopDomainError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(ShopDomainError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.')))
        {
            return Err(ShopDomainError::InvalidCharacter(c));
        }

        Ok(Self(s.to_string()))
    }

    /// Get the domain as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShopDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
