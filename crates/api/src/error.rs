use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::services::BackendError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Template rendering failed: {0}")]
    Render(#[from] tera::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Backend(err) => match err {
                BackendError::Status { status: 404, .. } => {
                    (StatusCode::NOT_FOUND, err.user_message("Không tìm thấy"))
                }
                BackendError::Status { status: 401, .. } => (
                    StatusCode::UNAUTHORIZED,
                    err.user_message("Phiên đăng nhập đã hết hạn"),
                ),
                _ => {
                    tracing::warn!(error = %err, "Backend call failed");
                    (StatusCode::BAD_GATEWAY, err.user_message("Lỗi máy chủ"))
                }
            },
            AppError::Render(err) => {
                tracing::error!(error = ?err, "Template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Đã xảy ra lỗi nội bộ".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Đã xảy ra lỗi nội bộ".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = format!(
            "<!DOCTYPE html><html lang=\"vi\"><head><meta charset=\"utf-8\"><title>{code}</title></head>\
             <body><main class=\"error\"><h1>{code}</h1><p>{message}</p></main></body></html>",
            code = status.as_u16(),
            message = tera::escape_html(&message),
        );

        (status, Html(body)).into_response()
    }
}

/// "Thiếu thông tin bắt buộc: ..." listing the rejected fields.
pub fn missing_fields_message(errors: &validator::ValidationErrors) -> String {
    let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
    fields.sort_unstable();
    format!("Thiếu thông tin bắt buộc: {}", fields.join(", "))
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(missing_fields_message(&errors))
    }
}
