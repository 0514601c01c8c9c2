//! View models for the invitation page and the template preview.
//!
//! Each struct is the data one template block needs; none of them carry
//! behavior beyond choosing placeholders and formatting times.

use chrono::FixedOffset;
use domain::models::schedule::visible_entries;
use domain::models::{Invitation, ScheduleEntry, TemplateForm, DEFAULT_SALUTATION};
use domain::services::RsvpView;
use serde::Serialize;
use shared::datetime::format_display_or_raw;

use crate::services::maps::static_map_url;

/// Preview recipient pre-filled on template pages.
pub const PREVIEW_RECIPIENT_NAME: &str = "Bùi Hiếu";
pub const PREVIEW_RECIPIENT_TITLE: &str = "Mr";

const PLACEHOLDER_TITLE: &str = "Tiêu đề";
const PLACEHOLDER_COMPANY: &str = "Company";
const PLACEHOLDER_RECIPIENT: &str = "Tên người nhận";
const PLACEHOLDER_CONTENT: &str = "Nội dung thư mời...";
const PLACEHOLDER_TIME: &str = "Chưa đặt thời gian";
const PLACEHOLDER_LOCATION: &str = "Chưa đặt địa điểm";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderView {
    pub company_name: String,
    pub title: String,
}

/// Letter body addressed to the guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCardView {
    pub salutation: String,
    pub recipient_name: String,
    pub recipient_title: Option<String>,
    /// "Kính gửi {salutation} {name},"
    pub greeting: String,
    pub content: String,
}

impl ContentCardView {
    fn new(salutation: &str, recipient_name: &str, recipient_title: &str, content: &str) -> Self {
        let salutation = Some(salutation.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SALUTATION)
            .to_string();
        Self {
            greeting: format!("Kính gửi {} {},", salutation, recipient_name),
            salutation,
            recipient_name: recipient_name.to_string(),
            recipient_title: Some(recipient_title.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            content: content.to_string(),
        }
    }
}

/// Time and place, with an optional map link and static map image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeLocationView {
    pub time: String,
    pub location: String,
    pub map_url: Option<String>,
    pub static_map_url: Option<String>,
}

impl TimeLocationView {
    fn new(time: String, location: String, map_url: Option<&str>, maps_key: Option<&str>) -> Self {
        let map_url = map_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let static_map_url = map_url
            .as_deref()
            .and_then(|url| static_map_url(maps_key, &location, url));

        Self {
            time,
            location,
            map_url,
            static_map_url,
        }
    }
}

/// Everything the invitation body renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationView {
    pub header: HeaderView,
    pub card: ContentCardView,
    pub time_location: TimeLocationView,
    /// Empty when no timeline should be shown.
    pub schedule: Vec<ScheduleEntry>,
    pub rsvp: RsvpView,
}

impl InvitationView {
    pub fn from_invitation(
        invitation: &Invitation,
        zone: &FixedOffset,
        maps_key: Option<&str>,
        rsvp: RsvpView,
    ) -> Self {
        Self {
            header: HeaderView {
                company_name: invitation.company_name.clone(),
                title: invitation.title.clone(),
            },
            card: ContentCardView::new(
                invitation.salutation(),
                &invitation.recipient_name,
                &invitation.recipient_title,
                &invitation.content,
            ),
            time_location: TimeLocationView::new(
                format_display_or_raw(&invitation.event_time, zone),
                invitation.event_location.clone(),
                invitation.google_map_url.as_deref(),
                maps_key,
            ),
            schedule: invitation
                .schedule
                .as_deref()
                .map(visible_entries)
                .unwrap_or_default(),
            rsvp,
        }
    }

    /// Renders an unsaved template with placeholders and an inert RSVP block.
    pub fn preview(
        form: &TemplateForm,
        recipient_name: &str,
        recipient_title: &str,
        zone: &FixedOffset,
        maps_key: Option<&str>,
    ) -> Self {
        let time = match form.event_time.trim() {
            "" => PLACEHOLDER_TIME.to_string(),
            raw => format_display_or_raw(raw, zone),
        };

        Self {
            header: HeaderView {
                company_name: or_placeholder(&form.company_name, PLACEHOLDER_COMPANY),
                title: or_placeholder(&form.title, PLACEHOLDER_TITLE),
            },
            card: ContentCardView::new(
                DEFAULT_SALUTATION,
                &or_placeholder(recipient_name, PLACEHOLDER_RECIPIENT),
                recipient_title,
                &or_placeholder(&form.content, PLACEHOLDER_CONTENT),
            ),
            time_location: TimeLocationView::new(
                time,
                or_placeholder(&form.event_location, PLACEHOLDER_LOCATION),
                Some(form.google_map_url.as_str()),
                maps_key,
            ),
            schedule: visible_entries(&form.schedule),
            rsvp: RsvpView::preview(),
        }
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}
