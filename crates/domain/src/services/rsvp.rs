//! RSVP reconciliation and the guest confirmation control.
//!
//! A guest's choice lives in three places: the invitation record on the
//! server, a durable per-invitation cache and a short-lived cookie set by the
//! backend when the guest responds. On load the sources are reconciled in a
//! fixed order:
//! 1. Server response (authoritative)
//! 2. Durable cache
//! 3. Session cookie (also backfills the durable cache)
//!
//! [`RsvpControl`] then enforces the edit/lock rules: once a choice is
//! recorded both actions are disabled until the guest asks to change it, and
//! only one submission may be in flight at a time.

use serde::Serialize;
use shared::validation::{clamp_attendee_count, parse_attendee_count, parse_stored_attendee_count};
use thiserror::Error;
use tracing::debug;

use crate::models::{RsvpResponse, RsvpStatus, RsvpSubmission};

use super::storage::KeyValueStore;

/// Message shown when a submission fails without a server detail.
pub const SUBMIT_FAILED_MESSAGE: &str = "Gửi phản hồi thất bại.";

const BUSY_LABEL: &str = "Đang gửi...";
const EDIT_HINT: &str = "Chọn lại để cập nhật phản hồi.";

/// Storage keys for one invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpKeys {
    /// Durable cached choice.
    pub confirmed: String,
    /// Durable cached attendee count.
    pub attendees: String,
    /// Cookie written by the backend on response.
    pub choice_cookie: String,
}

impl RsvpKeys {
    pub fn for_invitation(invitation_id: impl std::fmt::Display) -> Self {
        Self {
            confirmed: format!("invite_confirmed_{}", invitation_id),
            attendees: format!("invite_attendees_{}", invitation_id),
            choice_cookie: format!("invite_choice_{}", invitation_id),
        }
    }
}

/// Where a reconciled choice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceSource {
    Server,
    Cache,
    Cookie,
}

impl std::fmt::Display for ChoiceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server => write!(f, "server"),
            Self::Cache => write!(f, "cache"),
            Self::Cookie => write!(f, "cookie"),
        }
    }
}

/// Canonical choice after reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedChoice {
    pub response: RsvpResponse,
    pub source: ChoiceSource,
}

/// Reconciles the three sources. The first valid value wins in the order
/// server, cache, cookie. `PENDING` and unknown strings are ignored.
pub fn resolve_choice(
    server: Option<RsvpStatus>,
    cache: Option<&str>,
    cookie: Option<&str>,
) -> Option<ResolvedChoice> {
    let from_server = server
        .and_then(RsvpResponse::from_status)
        .map(|response| (response, ChoiceSource::Server));
    let from_cache = cache
        .and_then(|raw| raw.parse::<RsvpResponse>().ok())
        .map(|response| (response, ChoiceSource::Cache));
    let from_cookie = cookie
        .and_then(|raw| raw.parse::<RsvpResponse>().ok())
        .map(|response| (response, ChoiceSource::Cookie));

    from_server
        .or(from_cache)
        .or(from_cookie)
        .map(|(response, source)| ResolvedChoice { response, source })
}

/// Failure reported by a submitter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("RSVP submission failed")]
pub struct SubmitError {
    /// Server-provided message, if any.
    pub detail: Option<String>,
}

impl SubmitError {
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }
}

/// Sends a guest's RSVP to the backend.
#[async_trait::async_trait]
pub trait RsvpSubmitter: Send + Sync {
    async fn submit(&self, submission: &RsvpSubmission) -> Result<(), SubmitError>;
}

/// Result of a [`RsvpControl::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The choice was recorded and cached.
    Committed,
    /// The submitter failed; the error is populated.
    Failed,
    /// The control was busy or locked; nothing was sent.
    Ignored,
}

/// Refusal to open the quantity step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("RSVP actions are disabled")]
pub struct ActionsDisabled;

/// Guest-side RSVP state machine for one invitation.
#[derive(Debug, Clone)]
pub struct RsvpControl {
    keys: RsvpKeys,
    confirmed: Option<RsvpResponse>,
    source: Option<ChoiceSource>,
    attendee_count: u8,
    edit_mode: bool,
    loading: bool,
    error: Option<String>,
    attend_step_open: bool,
}

impl RsvpControl {
    /// Builds the control from the server state and both client stores.
    ///
    /// When the cookie supplies the choice it is copied into the durable
    /// cache. Store failures are treated as missing values.
    pub fn load(
        invitation_id: impl std::fmt::Display,
        server_status: Option<RsvpStatus>,
        server_count: Option<i64>,
        durable: &mut dyn KeyValueStore,
        cookies: &dyn KeyValueStore,
    ) -> Self {
        let keys = RsvpKeys::for_invitation(invitation_id);

        let cached = read_ignoring_errors(&*durable, &keys.confirmed);
        let cookie = read_ignoring_errors(cookies, &keys.choice_cookie);
        let resolved = resolve_choice(server_status, cached.as_deref(), cookie.as_deref());

        if let Some(choice) = resolved.filter(|c| c.source == ChoiceSource::Cookie) {
            if let Err(e) = durable.set(&keys.confirmed, choice.response.as_str()) {
                debug!(error = %e, key = %keys.confirmed, "Failed to backfill RSVP cache");
            }
        }

        let attendee_count = match resolved.map(|c| c.response) {
            Some(RsvpResponse::Declined) => 0,
            _ if server_status == Some(RsvpStatus::Attending) => {
                // Zero and missing counts both mean a party of one.
                let count = server_count.filter(|n| *n != 0).unwrap_or(1);
                clamp_attendee_count(count as f64)
            }
            _ => read_ignoring_errors(&*durable, &keys.attendees)
                .as_deref()
                .and_then(parse_stored_attendee_count)
                .unwrap_or(1),
        };

        Self {
            keys,
            confirmed: resolved.map(|c| c.response),
            source: resolved.map(|c| c.source),
            attendee_count,
            edit_mode: false,
            loading: false,
            error: None,
            attend_step_open: false,
        }
    }

    pub fn keys(&self) -> &RsvpKeys {
        &self.keys
    }

    pub fn confirmed(&self) -> Option<RsvpResponse> {
        self.confirmed
    }

    /// Source of the choice found at load time.
    pub fn source(&self) -> Option<ChoiceSource> {
        self.source
    }

    pub fn attendee_count(&self) -> u8 {
        self.attendee_count
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn attend_step_open(&self) -> bool {
        self.attend_step_open
    }

    /// Both action buttons are disabled while busy or while a recorded
    /// choice is locked.
    pub fn buttons_disabled(&self) -> bool {
        self.loading || (self.confirmed.is_some() && !self.edit_mode)
    }

    /// Opens the quantity step for an "attending" answer.
    pub fn begin_attending(&mut self) -> Result<(), ActionsDisabled> {
        if self.buttons_disabled() {
            return Err(ActionsDisabled);
        }
        self.error = None;
        if self.attendee_count == 0 {
            self.attendee_count = 1;
        }
        self.attend_step_open = true;
        Ok(())
    }

    /// Applies a typed party size. Non-numeric input is ignored.
    pub fn set_attendee_count(&mut self, raw: &str) {
        if let Some(count) = parse_attendee_count(raw) {
            self.attendee_count = count;
        }
    }

    pub fn just_me(&mut self) {
        self.attendee_count = 1;
    }

    /// Closes the quantity step unless a submission is in flight.
    pub fn cancel_attending(&mut self) {
        if !self.loading {
            self.attend_step_open = false;
        }
    }

    /// Unlocks a recorded choice for one more submission.
    pub fn enter_edit_mode(&mut self) {
        self.error = None;
        if self.confirmed.is_some() {
            self.edit_mode = true;
        }
    }

    /// Starts a submission, returning the body to send.
    ///
    /// Returns `None` when the control is busy or locked.
    pub fn begin_submit(&mut self, response: RsvpResponse) -> Option<RsvpSubmission> {
        if self.buttons_disabled() {
            return None;
        }
        self.loading = true;
        self.error = None;

        Some(match response {
            RsvpResponse::Attending => RsvpSubmission::attending(self.attendee_count.max(1)),
            RsvpResponse::Declined => RsvpSubmission::declined(),
        })
    }

    /// Settles a submission started with [`Self::begin_submit`].
    pub fn finish_submit(
        &mut self,
        submission: &RsvpSubmission,
        result: Result<(), SubmitError>,
        durable: &mut dyn KeyValueStore,
    ) -> SubmitOutcome {
        self.loading = false;

        match result {
            Ok(()) => {
                let response = submission.response;
                self.confirmed = Some(response);
                self.attendee_count = match response {
                    RsvpResponse::Attending => submission.attendee_count.unwrap_or(1),
                    RsvpResponse::Declined => 0,
                };
                self.edit_mode = false;
                self.attend_step_open = false;
                self.persist(durable);
                SubmitOutcome::Committed
            }
            Err(e) => {
                self.error = Some(
                    e.detail
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| SUBMIT_FAILED_MESSAGE.to_string()),
                );
                SubmitOutcome::Failed
            }
        }
    }

    /// Submits a choice through `submitter` and applies the outcome.
    pub async fn submit(
        &mut self,
        response: RsvpResponse,
        submitter: &dyn RsvpSubmitter,
        durable: &mut dyn KeyValueStore,
    ) -> SubmitOutcome {
        let Some(submission) = self.begin_submit(response) else {
            return SubmitOutcome::Ignored;
        };
        let result = submitter.submit(&submission).await;
        self.finish_submit(&submission, result, durable)
    }

    fn persist(&self, durable: &mut dyn KeyValueStore) {
        let Some(response) = self.confirmed else {
            return;
        };
        if let Err(e) = durable.set(&self.keys.confirmed, response.as_str()) {
            debug!(error = %e, "Failed to cache RSVP choice");
        }
        if response == RsvpResponse::Attending {
            if let Err(e) = durable.set(&self.keys.attendees, &self.attendee_count.to_string()) {
                debug!(error = %e, "Failed to cache attendee count");
            }
        }
    }

    /// "Already recorded" text, e.g. "Tôi sẽ tham dự (3 người)".
    pub fn summary(&self) -> Option<String> {
        self.confirmed.map(|response| match response {
            RsvpResponse::Attending => format!(
                "{} ({} người)",
                response.label(),
                self.attendee_count.max(1)
            ),
            RsvpResponse::Declined => response.label().to_string(),
        })
    }

    pub fn show_change_affordance(&self) -> bool {
        self.confirmed.is_some() && !self.edit_mode
    }

    pub fn edit_hint(&self) -> Option<&'static str> {
        (self.confirmed.is_some() && self.edit_mode).then_some(EDIT_HINT)
    }

    pub fn busy_label(&self) -> Option<&'static str> {
        self.loading.then_some(BUSY_LABEL)
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> RsvpView {
        RsvpView {
            confirmed: self.confirmed.map(|r| r.as_str()),
            attendee_count: self.attendee_count,
            summary: self.summary(),
            buttons_disabled: self.buttons_disabled(),
            show_change_affordance: self.show_change_affordance(),
            edit_mode: self.edit_mode,
            edit_hint: self.edit_hint(),
            busy_label: self.busy_label(),
            error: self.error.clone(),
            attend_step_open: self.attend_step_open,
            attending_selected: self.confirmed == Some(RsvpResponse::Attending),
            declined_selected: self.confirmed == Some(RsvpResponse::Declined),
        }
    }
}

fn read_ignoring_errors(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            debug!(error = %e, key = %key, "RSVP store read failed");
            None
        }
    }
}

/// Render-ready RSVP state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RsvpView {
    pub confirmed: Option<&'static str>,
    pub attendee_count: u8,
    pub summary: Option<String>,
    pub buttons_disabled: bool,
    pub show_change_affordance: bool,
    pub edit_mode: bool,
    pub edit_hint: Option<&'static str>,
    pub busy_label: Option<&'static str>,
    pub error: Option<String>,
    pub attend_step_open: bool,
    pub attending_selected: bool,
    pub declined_selected: bool,
}

impl RsvpView {
    /// Inert control used by the template preview.
    pub fn preview() -> Self {
        Self {
            confirmed: None,
            attendee_count: 1,
            summary: None,
            buttons_disabled: true,
            show_change_affordance: false,
            edit_mode: false,
            edit_hint: None,
            busy_label: None,
            error: None,
            attend_step_open: false,
            attending_selected: false,
            declined_selected: false,
        }
    }
}

/// Mock submitter for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MockRsvpSubmitter {
    /// Error returned instead of succeeding.
    pub failure: Option<SubmitError>,
    submitted: std::sync::Arc<std::sync::Mutex<Vec<RsvpSubmission>>>,
}

impl MockRsvpSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: SubmitError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Submissions received so far.
    pub fn submitted(&self) -> Vec<RsvpSubmission> {
        self.submitted
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RsvpSubmitter for MockRsvpSubmitter {
    async fn submit(&self, submission: &RsvpSubmission) -> Result<(), SubmitError> {
        if let Ok(mut guard) = self.submitted.lock() {
            guard.push(submission.clone());
        }
        match &self.failure {
            Some(error) => {
                tracing::warn!(response = %submission.response.as_str(), "Mock RSVP submitter simulating failure");
                Err(error.clone())
            }
            None => Ok(()),
        }
    }
}
