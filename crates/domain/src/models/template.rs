//! Invitation template models.
//!
//! A template is a reusable preset for the event details shared by many
//! invitations. Admins edit it through [`TemplateForm`] and the backend
//! receives a [`TemplatePayload`].

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use shared::datetime::to_datetime_local_value;
use shared::validation::non_blank;
use uuid::Uuid;
use validator::Validate;

use super::schedule::{default_schedule, ScheduleEntry};

/// Organizer name used when a template or form leaves it empty.
pub const DEFAULT_COMPANY_NAME: &str = "CÔNG TY TNHH CÔNG NGHỆ VÀ DỊCH VỤ GTE";

/// Template as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub event_location: Option<String>,
    #[serde(default)]
    pub google_map_url: Option<String>,
    #[serde(default)]
    pub schedule: Option<Vec<ScheduleEntry>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Editable template fields. Optional backend fields are plain strings here
/// and become `null` when left blank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct TemplateForm {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub name: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub company_name: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
    pub event_time: String,
    pub event_location: String,
    pub google_map_url: String,
    #[validate(nested)]
    pub schedule: Vec<ScheduleEntry>,
}

impl TemplateForm {
    /// Values pre-filled on the create page.
    pub fn defaults() -> Self {
        Self {
            name: "GTE - Year End".to_string(),
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            title: "Lễ tổng kết cuối năm".to_string(),
            content: "Trân trọng mời anh/chị tham dự sự kiện YEAR END PARTY.\n\
                      Sự hiện diện của anh/chị sẽ là niềm vinh dự lớn của chúng tôi.\n\n\
                      Trân trọng,\nBan tổ chức"
                .to_string(),
            event_time: String::new(),
            event_location: String::new(),
            google_map_url: String::new(),
            schedule: default_schedule(),
        }
    }

    /// Loads an existing template for editing.
    pub fn from_template(template: &Template, zone: &FixedOffset) -> Self {
        Self {
            name: template.name.clone(),
            company_name: template.company_name.clone(),
            title: template.title.clone(),
            content: template.content.clone(),
            event_time: template
                .event_time
                .as_deref()
                .map(|raw| to_datetime_local_value(raw, zone))
                .unwrap_or_default(),
            event_location: template.event_location.clone().unwrap_or_default(),
            google_map_url: template.google_map_url.clone().unwrap_or_default(),
            schedule: template.schedule.clone().unwrap_or_default(),
        }
    }

    /// Builds the create/update body.
    pub fn to_payload(&self) -> TemplatePayload {
        TemplatePayload {
            name: self.name.clone(),
            company_name: self.company_name.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            event_time: non_blank(&self.event_time),
            event_location: non_blank(&self.event_location),
            google_map_url: non_blank(&self.google_map_url),
            schedule: (!self.schedule.is_empty()).then(|| self.schedule.clone()),
        }
    }
}

/// Request body for template create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePayload {
    pub name: String,
    pub company_name: String,
    pub title: String,
    pub content: String,
    pub event_time: Option<String>,
    pub event_location: Option<String>,
    pub google_map_url: Option<String>,
    pub schedule: Option<Vec<ScheduleEntry>>,
}
