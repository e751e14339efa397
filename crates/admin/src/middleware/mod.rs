//! HTTP middleware and extractors for the admin tool.
//!
//! The admin-session authenticator lives outside this repository; the
//! [`shop`] extractor is the seam where it plugs in.

pub mod shop;

pub use shop::RequireShop;
