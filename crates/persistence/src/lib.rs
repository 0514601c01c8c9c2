//! Client-persisted state for the invitation portal.
//!
//! This crate contains:
//! - A cookie-backed key-value store that records pending writes
//! - The admin token store

pub mod admin_token;
pub mod cookie_jar;

pub use admin_token::{AdminTokenStore, ADMIN_TOKEN_KEY};
pub use cookie_jar::{parse_cookie_header, CookieJarStore, Lifetime, PendingCookie};
