//! Backend REST API abstraction.
//!
//! Every page talks to the external backend through [`InvitationBackend`].
//! The production implementation is [`super::http_backend::HttpBackend`];
//! tests substitute an in-process mock.

use domain::models::{
    ImportResult, Invitation, InvitationListItem, InvitationPayload, LoginRequest,
    RsvpSubmission, Template, TemplatePayload, TokenResponse, ValidImport,
};
use metrics::{counter, histogram};
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

/// Shown for connectivity failures on every page.
pub const CONNECT_FAILED_MESSAGE: &str = "Không thể kết nối API";

/// Errors returned by backend calls.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Backend unreachable: {0}")]
    Connect(String),

    #[error("Backend returned HTTP {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Invalid backend response: {0}")]
    Decode(String),
}

impl BackendError {
    /// Server-provided `detail` string, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Message for pages that surface the server detail verbatim.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Connect(_) => CONNECT_FAILED_MESSAGE.to_string(),
            _ => self.detail().unwrap_or(fallback).to_string(),
        }
    }

    /// Message for pages that show a fixed string on any rejection.
    pub fn static_message(&self, fallback: &str) -> String {
        match self {
            BackendError::Connect(_) => CONNECT_FAILED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Outcome of a guest RSVP call.
#[derive(Debug, Clone, Default)]
pub struct ResponseReceipt {
    /// Raw `Set-Cookie` values to relay to the browser.
    pub set_cookies: Vec<String>,
}

/// Operations offered by the backend.
#[async_trait::async_trait]
pub trait InvitationBackend: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<TokenResponse, BackendError>;

    async fn list_templates(&self, token: &str) -> Result<Vec<Template>, BackendError>;

    async fn get_template(&self, token: &str, id: Uuid) -> Result<Template, BackendError>;

    async fn create_template(
        &self,
        token: &str,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError>;

    async fn update_template(
        &self,
        token: &str,
        id: Uuid,
        payload: &TemplatePayload,
    ) -> Result<Template, BackendError>;

    async fn delete_template(&self, token: &str, id: Uuid) -> Result<(), BackendError>;

    async fn list_invitations(&self, token: &str)
        -> Result<Vec<InvitationListItem>, BackendError>;

    async fn create_invitation(
        &self,
        token: &str,
        payload: &InvitationPayload,
    ) -> Result<Invitation, BackendError>;

    async fn delete_invitation(&self, token: &str, id: Uuid) -> Result<(), BackendError>;

    async fn import_invitations(
        &self,
        token: &str,
        upload: &ValidImport,
    ) -> Result<ImportResult, BackendError>;

    /// Public invitation by slug. `Ok(None)` when the backend has none.
    async fn get_public_invitation(&self, slug: &str) -> Result<Option<Invitation>, BackendError>;

    /// Records a guest response, forwarding the guest's cookies.
    async fn submit_response(
        &self,
        slug: &str,
        submission: &RsvpSubmission,
        cookie_header: Option<&str>,
    ) -> Result<ResponseReceipt, BackendError>;
}

/// Times a backend call and records its outcome.
///
/// Usage:
/// ```ignore
/// let timer = BackendCallTimer::new("list_templates");
/// let result = client.get(url).send().await;
/// timer.finish(result.is_ok());
/// ```
pub struct BackendCallTimer {
    endpoint: &'static str,
    start: Instant,
}

impl BackendCallTimer {
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            start: Instant::now(),
        }
    }

    /// Records `backend_requests_total` and `backend_request_duration_seconds`.
    pub fn finish(self, success: bool) {
        let outcome = if success { "success" } else { "error" };
        counter!(
            "backend_requests_total",
            "endpoint" => self.endpoint,
            "outcome" => outcome
        )
        .increment(1);
        histogram!(
            "backend_request_duration_seconds",
            "endpoint" => self.endpoint
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}
