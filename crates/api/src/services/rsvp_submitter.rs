//! Adapts the backend client to the guest RSVP control.

use std::sync::Mutex;

use domain::models::RsvpSubmission;
use domain::services::{RsvpSubmitter, SubmitError};

use super::backend::{BackendError, InvitationBackend, CONNECT_FAILED_MESSAGE};

/// Submits RSVPs for one invitation slug and keeps the backend's cookies.
pub struct BackendRsvpSubmitter<'a> {
    backend: &'a dyn InvitationBackend,
    slug: &'a str,
    cookie_header: Option<&'a str>,
    relayed: Mutex<Vec<String>>,
}

impl<'a> BackendRsvpSubmitter<'a> {
    pub fn new(
        backend: &'a dyn InvitationBackend,
        slug: &'a str,
        cookie_header: Option<&'a str>,
    ) -> Self {
        Self {
            backend,
            slug,
            cookie_header,
            relayed: Mutex::new(Vec::new()),
        }
    }

    /// `Set-Cookie` values returned by the backend on success.
    pub fn into_relayed(self) -> Vec<String> {
        self.relayed.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl RsvpSubmitter for BackendRsvpSubmitter<'_> {
    async fn submit(&self, submission: &RsvpSubmission) -> Result<(), SubmitError> {
        match self
            .backend
            .submit_response(self.slug, submission, self.cookie_header)
            .await
        {
            Ok(receipt) => {
                if let Ok(mut relayed) = self.relayed.lock() {
                    relayed.extend(receipt.set_cookies);
                }
                Ok(())
            }
            Err(BackendError::Connect(_)) => Err(SubmitError::with_detail(CONNECT_FAILED_MESSAGE)),
            Err(e) => Err(SubmitError {
                detail: e.detail().map(str::to_string),
            }),
        }
    }
}
