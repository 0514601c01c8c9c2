//! Invitation list and creation pages.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use domain::models::schedule::{add_row, remove_row};
use domain::models::{
    InvitationForm, InvitationListItem, InvitationStatus, RsvpStatus, Template, SALUTATIONS,
};
use domain::services::{filter_items, RsvpFilter, RsvpStats};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{missing_fields_message, AppError};
use crate::extractors::AdminToken;
use crate::routes::admin_templates::load_templates;
use crate::routes::form_fields::{FormFields, FormOp};

const INVITATIONS_PATH: &str = "/admin/invitations";
const SAVE_FAILED_MESSAGE: &str = "Lỗi lưu thiệp";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub rsvp: Option<String>,
}

#[derive(Serialize)]
struct FilterOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

#[derive(Serialize)]
struct InvitationRow {
    id: Uuid,
    title: String,
    recipient: String,
    recipient_title: String,
    status: &'static str,
    rsvp: &'static str,
    rsvp_class: &'static str,
    responses: u32,
    link: Option<String>,
    confirm: String,
}

impl From<&InvitationListItem> for InvitationRow {
    fn from(item: &InvitationListItem) -> Self {
        let invitation = &item.invitation;
        let rsvp = invitation.rsvp_or_pending();
        let recipient_title = match invitation.recipient_title.trim() {
            "" => "-".to_string(),
            title => title.to_string(),
        };

        Self {
            id: invitation.id,
            title: invitation.title.clone(),
            recipient: invitation.recipient_display(),
            recipient_title,
            status: invitation.status.as_str(),
            rsvp: rsvp.as_str(),
            rsvp_class: match rsvp {
                RsvpStatus::Attending => "attending",
                RsvpStatus::Declined => "declined",
                RsvpStatus::Pending => "pending",
            },
            responses: item.responses_or_zero(),
            link: invitation.public_path(),
            confirm: format!("Xóa thiệp mời \"{}\"?", invitation.title),
        }
    }
}

#[derive(Serialize)]
struct InvitationListPage {
    page_title: &'static str,
    stats: RsvpStats,
    filters: Vec<FilterOption>,
    rows: Vec<InvitationRow>,
}

#[derive(Serialize)]
struct TemplateOption {
    id: Uuid,
    name: String,
}

#[derive(Serialize)]
struct InvitationFormPage {
    page_title: &'static str,
    templates: Vec<TemplateOption>,
    selected_template_id: String,
    salutations: &'static [&'static str],
    form: InvitationForm,
    error: Option<String>,
}

/// GET /admin/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    token: AdminToken,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let filter = query
        .rsvp
        .as_deref()
        .and_then(|raw| raw.parse::<RsvpFilter>().ok())
        .unwrap_or_default();

    let items = match state.backend.list_invitations(token.as_str()).await {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, "Failed to load invitations");
            Vec::new()
        }
    };

    let page = InvitationListPage {
        page_title: "Danh sách thiệp mời",
        stats: RsvpStats::from_items(&items),
        filters: RsvpFilter::ALL_FILTERS
            .iter()
            .map(|option| FilterOption {
                value: option.as_str(),
                label: match option {
                    RsvpFilter::All => option.label(),
                    _ => option.as_str(),
                },
                selected: *option == filter,
            })
            .collect(),
        rows: filter_items(&items, filter)
            .into_iter()
            .map(InvitationRow::from)
            .collect(),
    };
    Ok(state
        .views
        .render("admin/invitations_list.html", &page)?
        .into_response())
}

/// POST /admin/invitations/:id/delete
pub async fn delete_invitation(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<Uuid>,
) -> Redirect {
    match state.backend.delete_invitation(token.as_str(), id).await {
        Ok(()) => info!(invitation_id = %id, "Invitation deleted"),
        Err(e) => warn!(invitation_id = %id, error = %e, "Failed to delete invitation"),
    }
    Redirect::to(INVITATIONS_PATH)
}

/// GET /admin/invitations/create
pub async fn create_page(
    State(state): State<AppState>,
    token: AdminToken,
) -> Result<Response, AppError> {
    let templates = load_templates(&state, &token).await;
    let selected = templates
        .first()
        .map(|template| template.id.to_string())
        .unwrap_or_default();
    render_form(&state, &templates, selected, InvitationForm::default(), None)
}

/// POST /admin/invitations/create
pub async fn create_submit(
    State(state): State<AppState>,
    token: AdminToken,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let fields = FormFields::new(pairs);
    let templates = load_templates(&state, &token).await;
    let selected = fields.text("template_id");
    let mut form = fields.invitation_form();

    let status = match fields.op() {
        FormOp::ApplyTemplate => {
            match templates
                .iter()
                .find(|template| template.id.to_string() == selected)
            {
                Some(template) => form.apply_template(template, &state.zone),
                None => warn!(template_id = %selected, "Selected template not found"),
            }
            return render_form(&state, &templates, selected, form, None);
        }
        FormOp::AddRow => {
            add_row(&mut form.schedule);
            return render_form(&state, &templates, selected, form, None);
        }
        FormOp::RemoveRow(index) => {
            remove_row(&mut form.schedule, index);
            return render_form(&state, &templates, selected, form, None);
        }
        FormOp::Preview => return render_form(&state, &templates, selected, form, None),
        FormOp::SaveDraft => InvitationStatus::Draft,
        FormOp::Save | FormOp::Publish => InvitationStatus::Published,
    };

    if let Err(errors) = form.validate() {
        let message = missing_fields_message(&errors);
        return render_form(&state, &templates, selected, form, Some(message));
    }

    match state
        .backend
        .create_invitation(token.as_str(), &form.to_payload(status))
        .await
    {
        Ok(created) => {
            info!(
                invitation_id = %created.id,
                status = %status,
                "Invitation created"
            );
            Ok(Redirect::to(INVITATIONS_PATH).into_response())
        }
        Err(e) => {
            warn!(error = %e, "Failed to create invitation");
            let message = e.static_message(SAVE_FAILED_MESSAGE);
            render_form(&state, &templates, selected, form, Some(message))
        }
    }
}

fn render_form(
    state: &AppState,
    templates: &[Template],
    selected_template_id: String,
    form: InvitationForm,
    error: Option<String>,
) -> Result<Response, AppError> {
    let page = InvitationFormPage {
        page_title: "Tạo thiệp mời",
        templates: templates
            .iter()
            .map(|template| TemplateOption {
                id: template.id,
                name: template.name.clone(),
            })
            .collect(),
        selected_template_id,
        salutations: &SALUTATIONS,
        form,
        error,
    };
    Ok(state
        .views
        .render("admin/invitation_form.html", &page)?
        .into_response())
}
