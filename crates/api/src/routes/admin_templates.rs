//! Template management pages.
//!
//! Create and edit share one form. The submit button's `op` decides whether
//! the schedule is edited, the preview refreshed or the template saved.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use domain::models::schedule::{add_row, remove_row};
use domain::models::{Template, TemplateForm};
use serde::Serialize;
use shared::datetime::format_display_or_raw;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::{missing_fields_message, AppError};
use crate::extractors::AdminToken;
use crate::routes::form_fields::{FormFields, FormOp};
use crate::views::{InvitationView, PREVIEW_RECIPIENT_NAME, PREVIEW_RECIPIENT_TITLE};

const TEMPLATES_PATH: &str = "/admin/templates";

/// Which template the form writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    Create,
    Edit(Uuid),
}

impl FormMode {
    fn heading(&self) -> &'static str {
        match self {
            FormMode::Create => "Tạo mẫu thiệp",
            FormMode::Edit(_) => "Sửa mẫu",
        }
    }

    fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Create => "Lưu mẫu",
            FormMode::Edit(_) => "Lưu",
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            FormMode::Create => "Lỗi tạo mẫu",
            FormMode::Edit(_) => "Lỗi lưu mẫu",
        }
    }

    fn action(&self) -> String {
        match self {
            FormMode::Create => format!("{}/create", TEMPLATES_PATH),
            FormMode::Edit(id) => format!("{}/{}/edit", TEMPLATES_PATH, id),
        }
    }

    fn delete_action(&self) -> Option<String> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(format!("{}/{}/delete", TEMPLATES_PATH, id)),
        }
    }
}

#[derive(Serialize)]
struct TemplateRow {
    id: Uuid,
    name: String,
    title: String,
    updated: String,
}

#[derive(Serialize)]
struct TemplateListPage {
    page_title: &'static str,
    templates: Vec<TemplateRow>,
}

#[derive(Serialize)]
struct TemplateFormPage {
    page_title: &'static str,
    heading: &'static str,
    submit_label: &'static str,
    action: String,
    delete_action: Option<String>,
    form: TemplateForm,
    preview_name: String,
    preview_title: String,
    preview: InvitationView,
    error: Option<String>,
}

/// Unsaved form plus the preview recipient.
struct TemplateDraft {
    form: TemplateForm,
    preview_name: String,
    preview_title: String,
}

impl TemplateDraft {
    fn new(form: TemplateForm) -> Self {
        Self {
            form,
            preview_name: PREVIEW_RECIPIENT_NAME.to_string(),
            preview_title: PREVIEW_RECIPIENT_TITLE.to_string(),
        }
    }

    fn from_fields(fields: &FormFields) -> Self {
        Self {
            form: fields.template_form(),
            preview_name: fields.text("preview_name"),
            preview_title: fields.text("preview_title"),
        }
    }
}

/// GET /admin/templates
pub async fn list_templates(
    State(state): State<AppState>,
    token: AdminToken,
) -> Result<Response, AppError> {
    let templates = load_templates(&state, &token).await;

    let page = TemplateListPage {
        page_title: "Mẫu thiệp",
        templates: templates
            .iter()
            .map(|template| row(template, &state))
            .collect(),
    };
    Ok(state
        .views
        .render("admin/templates_list.html", &page)?
        .into_response())
}

/// Template list for pickers and the list page. A failed load shows as empty.
pub async fn load_templates(state: &AppState, token: &AdminToken) -> Vec<Template> {
    match state.backend.list_templates(token.as_str()).await {
        Ok(templates) => templates,
        Err(e) => {
            warn!(error = %e, "Failed to load templates");
            Vec::new()
        }
    }
}

fn row(template: &Template, state: &AppState) -> TemplateRow {
    let updated = template
        .updated_at
        .as_deref()
        .or(template.created_at.as_deref())
        .map(|raw| format_display_or_raw(raw, &state.zone))
        .unwrap_or_default();

    TemplateRow {
        id: template.id,
        name: template.name.clone(),
        title: template.title.clone(),
        updated,
    }
}

/// GET /admin/templates/create
pub async fn create_page(State(state): State<AppState>) -> Result<Response, AppError> {
    render_form(
        &state,
        FormMode::Create,
        &TemplateDraft::new(TemplateForm::defaults()),
        None,
    )
}

/// POST /admin/templates/create
pub async fn create_submit(
    State(state): State<AppState>,
    token: AdminToken,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    handle_submit(&state, &token, FormMode::Create, FormFields::new(pairs)).await
}

/// GET /admin/templates/:id/edit
pub async fn edit_page(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let template = state.backend.get_template(token.as_str(), id).await?;
    let form = TemplateForm::from_template(&template, &state.zone);
    render_form(&state, FormMode::Edit(id), &TemplateDraft::new(form), None)
}

/// POST /admin/templates/:id/edit
pub async fn edit_submit(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<Uuid>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    handle_submit(&state, &token, FormMode::Edit(id), FormFields::new(pairs)).await
}

/// POST /admin/templates/:id/delete
pub async fn delete_template(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    state.backend.delete_template(token.as_str(), id).await?;
    info!(template_id = %id, "Template deleted");
    Ok(Redirect::to(TEMPLATES_PATH))
}

async fn handle_submit(
    state: &AppState,
    token: &AdminToken,
    mode: FormMode,
    fields: FormFields,
) -> Result<Response, AppError> {
    let mut draft = TemplateDraft::from_fields(&fields);

    match fields.op() {
        FormOp::AddRow => {
            add_row(&mut draft.form.schedule);
            render_form(state, mode, &draft, None)
        }
        FormOp::RemoveRow(index) => {
            remove_row(&mut draft.form.schedule, index);
            render_form(state, mode, &draft, None)
        }
        FormOp::Preview | FormOp::ApplyTemplate => render_form(state, mode, &draft, None),
        FormOp::Save | FormOp::Publish | FormOp::SaveDraft => {
            if let Err(errors) = draft.form.validate() {
                return render_form(state, mode, &draft, Some(missing_fields_message(&errors)));
            }

            let payload = draft.form.to_payload();
            let result = match mode {
                FormMode::Create => state.backend.create_template(token.as_str(), &payload).await,
                FormMode::Edit(id) => {
                    state
                        .backend
                        .update_template(token.as_str(), id, &payload)
                        .await
                }
            };

            match result {
                Ok(saved) => {
                    info!(template_id = %saved.id, name = %saved.name, "Template saved");
                    Ok(Redirect::to(TEMPLATES_PATH).into_response())
                }
                Err(e) => {
                    warn!(error = %e, "Failed to save template");
                    let message = e.static_message(mode.failure_message());
                    render_form(state, mode, &draft, Some(message))
                }
            }
        }
    }
}

fn render_form(
    state: &AppState,
    mode: FormMode,
    draft: &TemplateDraft,
    error: Option<String>,
) -> Result<Response, AppError> {
    let preview = InvitationView::preview(
        &draft.form,
        &draft.preview_name,
        &draft.preview_title,
        &state.zone,
        state.config.maps.api_key(),
    );

    let page = TemplateFormPage {
        page_title: mode.heading(),
        heading: mode.heading(),
        submit_label: mode.submit_label(),
        action: mode.action(),
        delete_action: mode.delete_action(),
        form: draft.form.clone(),
        preview_name: draft.preview_name.clone(),
        preview_title: draft.preview_title.clone(),
        preview,
        error,
    };
    Ok(state
        .views
        .render("admin/template_form.html", &page)?
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_mode_strings() {
        let id = Uuid::nil();
        assert_eq!(FormMode::Create.failure_message(), "Lỗi tạo mẫu");
        assert_eq!(FormMode::Edit(id).failure_message(), "Lỗi lưu mẫu");
        assert_eq!(FormMode::Create.action(), "/admin/templates/create");
        assert_eq!(
            FormMode::Edit(id).delete_action().as_deref(),
            Some("/admin/templates/00000000-0000-0000-0000-000000000000/delete")
        );
        assert!(FormMode::Create.delete_action().is_none());
    }
}
