//! DTF Reseller Core - Shared types and pricing engine.
//!
//! This crate provides the types shared across the DTF Reseller components:
//! - `admin` - The merchant-facing admin tool binary
//! - `integration-tests` - End-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Quote input/result types, the pricing engine, and the
//!   shop-domain newtype

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
