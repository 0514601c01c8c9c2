//! Custom Axum extractors.

pub mod admin_token;
pub mod page_origin;

pub use admin_token::{AdminToken, LOGIN_PATH};
pub use page_origin::RequestOrigin;
