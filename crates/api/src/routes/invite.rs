//! Public invitation page and guest RSVP.
//!
//! The RSVP control state lives in the browser's cookies: the durable cache
//! is written by this server, the session choice cookie is written by the
//! backend and relayed through on submission.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use domain::models::{Invitation, RsvpResponse};
use domain::services::{RsvpControl, SubmitOutcome};
use persistence::{CookieJarStore, Lifetime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::error::AppError;
use crate::middleware::metrics::record_rsvp_submission;
use crate::routes::form_fields::FormFields;
use crate::routes::pages::render_not_found;
use crate::services::{guest_cookie_header, BackendRsvpSubmitter};
use crate::views::InvitationView;

#[derive(Debug, Default, Deserialize)]
pub struct InviteQuery {
    #[serde(default)]
    pub edit: Option<String>,
    #[serde(default)]
    pub step: Option<String>,
}

impl InviteQuery {
    fn edit(&self) -> bool {
        matches!(self.edit.as_deref(), Some(value) if !value.is_empty() && value != "0")
    }

    fn attend_step(&self) -> bool {
        self.step.as_deref() == Some("attend")
    }
}

#[derive(Serialize)]
struct InvitePage<'a> {
    page_title: &'a str,
    slug: &'a str,
    invitation: InvitationView,
}

/// GET /invite/:slug
pub async fn show_invitation(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<InviteQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(invitation) = fetch_invitation(&state, &slug).await else {
        return Ok(render_not_found(&state));
    };

    let cookie_header = cookie_header(&headers);
    let (mut control, mut durable) = load_control(&invitation, cookie_header);
    if query.edit() {
        control.enter_edit_mode();
    }
    if query.attend_step() {
        if let Err(e) = control.begin_attending() {
            debug!(slug = %slug, error = %e, "Quantity step not opened");
        }
    }

    let mut response = render_page(&state, &slug, &invitation, &control)?;
    state
        .cookies
        .add_pending(response.headers_mut(), &durable.take_pending());
    Ok(response)
}

/// POST /invite/:slug/rsvp
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let fields = FormFields::new(pairs);
    let response = fields
        .get("response")
        .and_then(|raw| raw.parse::<RsvpResponse>().ok())
        .ok_or_else(|| AppError::Validation("Phản hồi không hợp lệ".to_string()))?;

    let Some(invitation) = fetch_invitation(&state, &slug).await else {
        return Ok(render_not_found(&state));
    };

    let cookie_header = cookie_header(&headers);
    let (mut control, mut durable) = load_control(&invitation, cookie_header);
    if fields.flag("edit") {
        control.enter_edit_mode();
    }
    if response == RsvpResponse::Attending {
        // Submitted from the quantity step, which stays open if the call fails.
        if let Err(e) = control.begin_attending() {
            debug!(slug = %slug, error = %e, "Quantity step not opened");
        }
        if fields.flag("just_me") {
            control.just_me();
        } else if let Some(raw) = fields.get("attendee_count") {
            control.set_attendee_count(raw);
        }
    }

    let forwarded = guest_cookie_header(cookie_header);
    let submitter =
        BackendRsvpSubmitter::new(state.backend.as_ref(), &slug, forwarded.as_deref());
    let outcome = control.submit(response, &submitter, &mut durable).await;
    let relayed = submitter.into_relayed();

    let outcome_label = match outcome {
        SubmitOutcome::Committed => "committed",
        SubmitOutcome::Failed => "failed",
        SubmitOutcome::Ignored => "ignored",
    };
    record_rsvp_submission(response.as_str(), outcome_label);
    info!(
        slug = %slug,
        response = response.as_str(),
        outcome = outcome_label,
        attendees = control.attendee_count(),
        "RSVP submitted"
    );

    let mut page = match outcome {
        SubmitOutcome::Failed => render_page(&state, &slug, &invitation, &control)?,
        SubmitOutcome::Committed | SubmitOutcome::Ignored => {
            Redirect::to(&invite_path(&slug)).into_response()
        }
    };
    state
        .cookies
        .add_pending(page.headers_mut(), &durable.take_pending());
    state.cookies.relay(page.headers_mut(), &relayed);
    Ok(page)
}

/// Public fetch; any failure is treated as a missing invitation.
async fn fetch_invitation(state: &AppState, slug: &str) -> Option<Invitation> {
    match state.backend.get_public_invitation(slug).await {
        Ok(invitation) => invitation,
        Err(e) => {
            warn!(slug = %slug, error = %e, "Failed to load public invitation");
            None
        }
    }
}

fn cookie_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
}

fn load_control(invitation: &Invitation, cookie_header: Option<&str>) -> (RsvpControl, CookieJarStore) {
    let mut durable = CookieJarStore::from_header(cookie_header, Lifetime::Durable);
    let session = CookieJarStore::from_header(cookie_header, Lifetime::Session);
    let control = RsvpControl::load(
        invitation.id,
        invitation.rsvp_status,
        invitation.attendee_count,
        &mut durable,
        &session,
    );
    if let Some(source) = control.source() {
        debug!(invitation_id = %invitation.id, source = %source, "RSVP choice restored");
    }
    (control, durable)
}

fn render_page(
    state: &AppState,
    slug: &str,
    invitation: &Invitation,
    control: &RsvpControl,
) -> Result<Response, AppError> {
    let view = InvitationView::from_invitation(
        invitation,
        &state.zone,
        state.config.maps.api_key(),
        control.view(),
    );
    let page = InvitePage {
        page_title: &invitation.title,
        slug,
        invitation: view,
    };
    Ok(state.views.render("invite.html", &page)?.into_response())
}

/// `/invite/{slug}` with the slug percent-encoded as one path segment.
pub fn invite_path(slug: &str) -> String {
    let Ok(mut url) = reqwest::Url::parse("http://localhost/invite") else {
        return "/".to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(slug);
    }
    url.path().to_string()
}
