//! Helpers for url-encoded admin forms.
//!
//! Admin forms repeat fields (`schedule_time`, `schedule_label`) and carry a
//! submit button value in `op`, so they are read as raw pairs instead of a
//! fixed struct.

use domain::models::schedule::{add_row, set_field};
use domain::models::{InvitationForm, ScheduleEntry, ScheduleField, TemplateForm};
use std::str::FromStr;

/// Action selected by the submit button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOp {
    Save,
    Publish,
    SaveDraft,
    AddRow,
    RemoveRow(usize),
    ApplyTemplate,
    Preview,
}

impl FromStr for FormOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "save" => Ok(FormOp::Save),
            "publish" => Ok(FormOp::Publish),
            "save_draft" => Ok(FormOp::SaveDraft),
            "add_row" => Ok(FormOp::AddRow),
            "apply_template" => Ok(FormOp::ApplyTemplate),
            "preview" => Ok(FormOp::Preview),
            other => other
                .strip_prefix("remove_row:")
                .and_then(|index| index.parse().ok())
                .map(FormOp::RemoveRow)
                .ok_or_else(|| format!("Unknown form action: {}", other)),
        }
    }
}

/// Submitted name/value pairs in document order.
#[derive(Debug, Clone, Default)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_string()
    }

    pub fn all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Checkbox-style flag: present, non-empty and not "0".
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(value) if !value.is_empty() && value != "0")
    }

    /// Button action; a missing or unknown `op` means save.
    pub fn op(&self) -> FormOp {
        self.get("op")
            .and_then(|op| op.parse().ok())
            .unwrap_or(FormOp::Save)
    }

    /// Schedule rows rebuilt from the repeated row inputs.
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        let times = self.all("schedule_time");
        let labels = self.all("schedule_label");

        let mut schedule = Vec::new();
        for index in 0..times.len().max(labels.len()) {
            add_row(&mut schedule);
            if let Some(time) = times.get(index) {
                set_field(&mut schedule, index, ScheduleField::Time, *time);
            }
            if let Some(label) = labels.get(index) {
                set_field(&mut schedule, index, ScheduleField::Label, *label);
            }
        }
        schedule
    }

    pub fn template_form(&self) -> TemplateForm {
        TemplateForm {
            name: self.text("name"),
            company_name: self.text("company_name"),
            title: self.text("title"),
            content: self.text("content"),
            event_time: self.text("event_time"),
            event_location: self.text("event_location"),
            google_map_url: self.text("google_map_url"),
            schedule: self.schedule(),
        }
    }

    pub fn invitation_form(&self) -> InvitationForm {
        InvitationForm {
            title: self.text("title"),
            company_name: self.text("company_name"),
            recipient_salutation: self.text("recipient_salutation"),
            recipient_name: self.text("recipient_name"),
            recipient_title: self.text("recipient_title"),
            content: self.text("content"),
            event_time: self.text("event_time"),
            event_location: self.text("event_location"),
            google_map_url: self.text("google_map_url"),
            schedule: self.schedule(),
        }
    }
}
