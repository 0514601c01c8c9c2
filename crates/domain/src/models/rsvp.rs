//! RSVP submission models.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::invitation::RsvpStatus;

/// A guest's committed answer. `PENDING` is never submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpResponse {
    Attending,
    Declined,
}

impl RsvpResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpResponse::Attending => "ATTENDING",
            RsvpResponse::Declined => "DECLINED",
        }
    }

    /// Button label shown to guests.
    pub fn label(&self) -> &'static str {
        match self {
            RsvpResponse::Attending => "Tôi sẽ tham dự",
            RsvpResponse::Declined => "Không thể tham dự",
        }
    }

    /// Converts a server status, discarding `PENDING`.
    pub fn from_status(status: RsvpStatus) -> Option<Self> {
        match status {
            RsvpStatus::Attending => Some(RsvpResponse::Attending),
            RsvpStatus::Declined => Some(RsvpResponse::Declined),
            RsvpStatus::Pending => None,
        }
    }
}

impl From<RsvpResponse> for RsvpStatus {
    fn from(response: RsvpResponse) -> Self {
        match response {
            RsvpResponse::Attending => RsvpStatus::Attending,
            RsvpResponse::Declined => RsvpStatus::Declined,
        }
    }
}

impl FromStr for RsvpResponse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ATTENDING" => Ok(RsvpResponse::Attending),
            "DECLINED" => Ok(RsvpResponse::Declined),
            other => Err(format!("Unknown RSVP response: {}", other)),
        }
    }
}

/// Body posted to `/api/invitations/{slug}/response`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpSubmission {
    pub response: RsvpResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendee_count: Option<u8>,
}

impl RsvpSubmission {
    pub fn attending(attendee_count: u8) -> Self {
        Self {
            response: RsvpResponse::Attending,
            attendee_count: Some(attendee_count),
        }
    }

    pub fn declined() -> Self {
        Self {
            response: RsvpResponse::Declined,
            attendee_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_format() {
        let attending = serde_json::to_value(RsvpSubmission::attending(3)).unwrap();
        assert_eq!(
            attending,
            serde_json::json!({"response": "ATTENDING", "attendee_count": 3})
        );

        let declined = serde_json::to_value(RsvpSubmission::declined()).unwrap();
        assert_eq!(declined, serde_json::json!({"response": "DECLINED"}));
    }

    #[test]
    fn test_from_status() {
        assert_eq!(
            RsvpResponse::from_status(RsvpStatus::Attending),
            Some(RsvpResponse::Attending)
        );
        assert_eq!(RsvpResponse::from_status(RsvpStatus::Pending), None);
        assert_eq!(RsvpStatus::from(RsvpResponse::Declined), RsvpStatus::Declined);
    }

    #[test]
    fn test_parse_response() {
        assert_eq!("ATTENDING".parse::<RsvpResponse>(), Ok(RsvpResponse::Attending));
        assert!("PENDING".parse::<RsvpResponse>().is_err());
        assert!("".parse::<RsvpResponse>().is_err());
    }
}
