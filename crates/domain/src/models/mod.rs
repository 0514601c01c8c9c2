//! Domain models for the invitation portal.

pub mod auth;
pub mod import;
pub mod invitation;
pub mod rsvp;
pub mod schedule;
pub mod template;

pub use auth::{LoginRequest, TokenResponse};
pub use import::{
    ImportCreatedItem, ImportErrorItem, ImportFile, ImportReport, ImportRequest, ImportResult,
    ImportValidationError, ValidImport, MAX_DISPLAYED_IMPORT_ERRORS,
};
pub use invitation::{
    Invitation, InvitationForm, InvitationListItem, InvitationPayload, InvitationStatus,
    RsvpStatus, DEFAULT_SALUTATION, SALUTATIONS,
};
pub use rsvp::{RsvpResponse, RsvpSubmission};
pub use schedule::{ScheduleEntry, ScheduleField};
pub use template::{Template, TemplateForm, TemplatePayload, DEFAULT_COMPANY_NAME};
