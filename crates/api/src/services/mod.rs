//! External service integrations and response helpers.

pub mod api_base;
pub mod backend;
pub mod cookies;
pub mod http_backend;
pub mod maps;
pub mod rsvp_submitter;

pub use api_base::{ApiBase, MixedContentPolicy, PageOrigin};
pub use backend::{BackendError, InvitationBackend, ResponseReceipt, CONNECT_FAILED_MESSAGE};
pub use cookies::{guest_cookie_header, CookieHelper};
pub use http_backend::HttpBackend;
pub use rsvp_submitter::BackendRsvpSubmitter;
