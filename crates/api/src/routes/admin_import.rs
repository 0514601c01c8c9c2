//! Spreadsheet import page.
//!
//! The selection checks run before the upload so a missing template or file
//! never reaches the backend.

use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use domain::models::{ImportFile, ImportReport, ImportRequest, InvitationStatus, Template};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::AppError;
use crate::extractors::AdminToken;
use crate::middleware::metrics::record_import;
use crate::routes::admin_templates::load_templates;

/// Upload size accepted on the import route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const IMPORT_FAILED_MESSAGE: &str = "Import thất bại";
const STATUSES: [&str; 2] = ["draft", "published"];

#[derive(Serialize)]
struct TemplateOption {
    id: Uuid,
    name: String,
}

#[derive(Serialize)]
struct ImportPage {
    page_title: &'static str,
    templates: Vec<TemplateOption>,
    selected_template_id: String,
    statuses: [&'static str; 2],
    status: &'static str,
    error: Option<String>,
    report: Option<ImportReport>,
    summary: Option<String>,
}

/// GET /admin/invitations/import
pub async fn import_page(
    State(state): State<AppState>,
    token: AdminToken,
) -> Result<Response, AppError> {
    let templates = load_templates(&state, &token).await;
    let selected = templates
        .first()
        .map(|template| template.id.to_string())
        .unwrap_or_default();
    render(&state, &templates, selected, InvitationStatus::Draft, None, None)
}

/// POST /admin/invitations/import
pub async fn import_submit(
    State(state): State<AppState>,
    token: AdminToken,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let request = read_upload(multipart).await?;
    let templates = load_templates(&state, &token).await;
    let selected = request.template_id.clone();
    let status = request.status;

    let upload = match request.validate() {
        Ok(upload) => upload,
        Err(e) => {
            return render(&state, &templates, selected, status, Some(e.to_string()), None);
        }
    };

    match state
        .backend
        .import_invitations(token.as_str(), &upload)
        .await
    {
        Ok(result) => {
            record_import(result.created, result.errors.len());
            info!(
                template_id = %upload.template_id,
                file = %upload.file.file_name,
                created = result.created,
                skipped = result.skipped,
                errors = result.errors.len(),
                "Invitations imported"
            );
            render(&state, &templates, selected, status, None, Some(result.report()))
        }
        Err(e) => {
            warn!(error = %e, "Import failed");
            let message = e.user_message(IMPORT_FAILED_MESSAGE);
            render(&state, &templates, selected, status, Some(message), None)
        }
    }
}

/// Collects the form parts. Unknown parts are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<ImportRequest, AppError> {
    let mut request = ImportRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "template_id" => {
                request.template_id = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
            }
            "status_value" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                request.status = raw.parse().map_err(AppError::Validation)?;
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                request.file = Some(ImportFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(request)
}

fn render(
    state: &AppState,
    templates: &[Template],
    selected_template_id: String,
    status: InvitationStatus,
    error: Option<String>,
    report: Option<ImportReport>,
) -> Result<Response, AppError> {
    let page = ImportPage {
        page_title: "Import danh sách",
        templates: templates
            .iter()
            .map(|template| TemplateOption {
                id: template.id,
                name: template.name.clone(),
            })
            .collect(),
        selected_template_id,
        statuses: STATUSES,
        status: status.as_str(),
        error,
        summary: report.as_ref().map(ImportReport::summary_line),
        report,
    };
    Ok(state
        .views
        .render("admin/import.html", &page)?
        .into_response())
}
