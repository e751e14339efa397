//! Core types for the DTF Reseller tool.
//!
//! This module provides the quote pricing engine and type-safe wrappers
//! for common domain concepts.

pub mod quote;
pub mod shop;

pub use quote::{PricingConfig, QuoteError, QuoteInput, QuoteResult, calculate};
pub use shop::{ShopDomain, ShopDomainError};
