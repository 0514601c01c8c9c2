//! Invitation domain models.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use shared::datetime::to_datetime_local_value;
use shared::validation::non_blank;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::schedule::ScheduleEntry;
use super::template::{Template, DEFAULT_COMPANY_NAME};

/// Salutation shown when an invitation has none.
pub const DEFAULT_SALUTATION: &str = "Ông";

/// Salutations offered on the create form.
pub const SALUTATIONS: [&str; 4] = ["Ông", "Bà", "Mr", "Ms"];

/// Publication state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    #[default]
    Draft,
    Published,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Draft => "draft",
            InvitationStatus::Published => "published",
        }
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvitationStatus::Draft),
            "published" => Ok(InvitationStatus::Published),
            other => Err(format!("Unknown invitation status: {}", other)),
        }
    }
}

/// Server-side response state of an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpStatus {
    Attending,
    Declined,
    #[default]
    Pending,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Attending => "ATTENDING",
            RsvpStatus::Declined => "DECLINED",
            RsvpStatus::Pending => "PENDING",
        }
    }

    /// Vietnamese label used in the admin table.
    pub fn label(&self) -> &'static str {
        match self {
            RsvpStatus::Attending => "Tham dự",
            RsvpStatus::Declined => "Từ chối",
            RsvpStatus::Pending => "Chưa phản hồi",
        }
    }
}

impl FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATTENDING" => Ok(RsvpStatus::Attending),
            "DECLINED" => Ok(RsvpStatus::Declined),
            "PENDING" => Ok(RsvpStatus::Pending),
            other => Err(format!("Unknown RSVP status: {}", other)),
        }
    }
}

/// Invitation as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: InvitationStatus,
    #[serde(default)]
    pub rsvp_status: Option<RsvpStatus>,
    #[serde(default)]
    pub attendee_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    pub title: String,
    pub company_name: String,
    #[serde(default)]
    pub recipient_salutation: Option<String>,
    pub recipient_name: String,
    #[serde(default)]
    pub recipient_title: String,
    pub content: String,
    #[serde(default)]
    pub event_time: String,
    #[serde(default)]
    pub event_location: String,
    #[serde(default)]
    pub google_map_url: Option<String>,
    #[serde(default)]
    pub schedule: Option<Vec<ScheduleEntry>>,
}

impl Invitation {
    /// Salutation for guest-facing pages, defaulting to [`DEFAULT_SALUTATION`].
    pub fn salutation(&self) -> &str {
        self.recipient_salutation
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SALUTATION)
    }

    /// "{salutation} {name}" for the admin table, or the bare name.
    pub fn recipient_display(&self) -> String {
        match self
            .recipient_salutation
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(salutation) => format!("{} {}", salutation, self.recipient_name),
            None => self.recipient_name.clone(),
        }
    }

    /// Response state, treating a missing value as pending.
    pub fn rsvp_or_pending(&self) -> RsvpStatus {
        self.rsvp_status.unwrap_or_default()
    }

    /// Public path of the invitation page.
    pub fn public_path(&self) -> Option<String> {
        self.slug
            .as_deref()
            .filter(|slug| !slug.is_empty())
            .map(|slug| format!("/invite/{}", slug))
    }
}

/// Row of the admin invitation list, with aggregate response counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationListItem {
    #[serde(flatten)]
    pub invitation: Invitation,
    #[serde(default)]
    pub responses: Option<u32>,
    #[serde(default)]
    pub attending: u32,
    #[serde(default)]
    pub attending_people: u32,
    #[serde(default)]
    pub declined: u32,
}

impl InvitationListItem {
    pub fn responses_or_zero(&self) -> u32 {
        self.responses.unwrap_or(0)
    }
}

/// Editable fields of the create-invitation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct InvitationForm {
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub company_name: String,
    pub recipient_salutation: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub recipient_name: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub recipient_title: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub event_time: String,
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub event_location: String,
    pub google_map_url: String,
    #[validate(nested)]
    pub schedule: Vec<ScheduleEntry>,
}

impl Default for InvitationForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            company_name: DEFAULT_COMPANY_NAME.to_string(),
            recipient_salutation: DEFAULT_SALUTATION.to_string(),
            recipient_name: String::new(),
            recipient_title: String::new(),
            content: String::new(),
            event_time: String::new(),
            event_location: String::new(),
            google_map_url: String::new(),
            schedule: Vec::new(),
        }
    }
}

impl InvitationForm {
    /// Copies a template's event details into the form.
    ///
    /// Recipient fields are left untouched. Event time, location and map
    /// link keep their current value when the template has none; the
    /// schedule is always replaced.
    pub fn apply_template(&mut self, template: &Template, zone: &FixedOffset) {
        self.company_name = if template.company_name.trim().is_empty() {
            DEFAULT_COMPANY_NAME.to_string()
        } else {
            template.company_name.clone()
        };
        self.title = template.title.clone();
        self.content = template.content.clone();

        let event_time = template
            .event_time
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .map(|raw| to_datetime_local_value(raw, zone))
            .unwrap_or_default();
        if !event_time.is_empty() {
            self.event_time = event_time;
        }
        if let Some(location) = &template.event_location {
            self.event_location = location.clone();
        }
        if let Some(map_url) = &template.google_map_url {
            self.google_map_url = map_url.clone();
        }
        self.schedule = template.schedule.clone().unwrap_or_default();
    }

    /// Builds the create body with the requested publication state.
    pub fn to_payload(&self, status: InvitationStatus) -> InvitationPayload {
        InvitationPayload {
            title: self.title.clone(),
            company_name: self.company_name.clone(),
            recipient_salutation: non_blank(&self.recipient_salutation),
            recipient_name: self.recipient_name.clone(),
            recipient_title: self.recipient_title.clone(),
            content: self.content.clone(),
            event_time: self.event_time.clone(),
            event_location: self.event_location.clone(),
            google_map_url: non_blank(&self.google_map_url),
            schedule: (!self.schedule.is_empty()).then(|| self.schedule.clone()),
            status,
        }
    }
}

/// Request body for invitation creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationPayload {
    pub title: String,
    pub company_name: String,
    pub recipient_salutation: Option<String>,
    pub recipient_name: String,
    pub recipient_title: String,
    pub content: String,
    pub event_time: String,
    pub event_location: String,
    pub google_map_url: Option<String>,
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub status: InvitationStatus,
}
