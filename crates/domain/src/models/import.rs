//! Spreadsheet import models.
//!
//! Admins upload an `.xlsx` file whose rows become invitations based on a
//! chosen template. The backend reports per-row outcomes; only the first
//! [`MAX_DISPLAYED_IMPORT_ERRORS`] row errors are shown.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::invitation::InvitationStatus;

/// Number of row errors listed on the result panel.
pub const MAX_DISPLAYED_IMPORT_ERRORS: usize = 20;

/// A row that produced an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCreatedItem {
    pub row: u32,
    pub id: Uuid,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A row the backend rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportErrorItem {
    pub row: u32,
    pub message: String,
}

/// Outcome of an import as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportResult {
    pub created: u32,
    pub skipped: u32,
    #[serde(default)]
    pub items: Vec<ImportCreatedItem>,
    #[serde(default)]
    pub errors: Vec<ImportErrorItem>,
}

impl ImportResult {
    pub fn report(&self) -> ImportReport {
        ImportReport {
            created: self.created,
            skipped: self.skipped,
            error_count: self.errors.len(),
            displayed_errors: self
                .errors
                .iter()
                .take(MAX_DISPLAYED_IMPORT_ERRORS)
                .map(|err| format!("Row {}: {}", err.row, err.message))
                .collect(),
            truncated: self.errors.len() > MAX_DISPLAYED_IMPORT_ERRORS,
        }
    }
}

/// Display-ready summary of an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: u32,
    pub skipped: u32,
    pub error_count: usize,
    pub displayed_errors: Vec<String>,
    pub truncated: bool,
}

impl ImportReport {
    pub fn summary_line(&self) -> String {
        format!(
            "Kết quả: {} tạo thành công, {} dòng trống bỏ qua, {} lỗi.",
            self.created, self.skipped, self.error_count
        )
    }
}

/// Uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Import form as submitted, before validation.
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub template_id: String,
    pub status: InvitationStatus,
    pub file: Option<ImportFile>,
}

/// Checked import ready to send to the backend.
#[derive(Debug, Clone)]
pub struct ValidImport {
    pub template_id: String,
    pub status: InvitationStatus,
    pub file: ImportFile,
}

/// Reasons an import is refused before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportValidationError {
    #[error("Vui lòng chọn mẫu")]
    MissingTemplate,

    #[error("Vui lòng chọn file .xlsx")]
    MissingFile,
}

impl ImportRequest {
    /// Checks the template first, then the file.
    pub fn validate(self) -> Result<ValidImport, ImportValidationError> {
        if self.template_id.trim().is_empty() {
            return Err(ImportValidationError::MissingTemplate);
        }
        // Browsers send an empty part with no filename when nothing was picked.
        let file = self
            .file
            .filter(|file| !file.file_name.is_empty())
            .ok_or(ImportValidationError::MissingFile)?;

        Ok(ValidImport {
            template_id: self.template_id,
            status: self.status,
            file,
        })
    }
}
