//! DTF Reseller Admin library.
//!
//! This crate provides the admin tool functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Components
//!
//! - Quote calculator endpoint (pricing engine lives in `dtf-reseller-core`)
//! - Dropbox OAuth connector with signed, single-use state
//! - Token persistence seam (in-memory by default)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod dropbox;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
