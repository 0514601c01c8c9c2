//! Admin invitation list statistics and filtering.

use serde::Serialize;
use std::str::FromStr;

use crate::models::{InvitationListItem, RsvpStatus};

/// Response filter on the admin list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RsvpFilter {
    #[default]
    All,
    Attending,
    Declined,
    Pending,
}

impl RsvpFilter {
    pub const ALL_FILTERS: [RsvpFilter; 4] = [
        RsvpFilter::All,
        RsvpFilter::Attending,
        RsvpFilter::Declined,
        RsvpFilter::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpFilter::All => "ALL",
            RsvpFilter::Attending => "ATTENDING",
            RsvpFilter::Declined => "DECLINED",
            RsvpFilter::Pending => "PENDING",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RsvpFilter::All => "Tất cả",
            RsvpFilter::Attending => "Tham dự",
            RsvpFilter::Declined => "Từ chối",
            RsvpFilter::Pending => "Chưa phản hồi",
        }
    }

    pub fn matches(&self, status: RsvpStatus) -> bool {
        match self {
            RsvpFilter::All => true,
            RsvpFilter::Attending => status == RsvpStatus::Attending,
            RsvpFilter::Declined => status == RsvpStatus::Declined,
            RsvpFilter::Pending => status == RsvpStatus::Pending,
        }
    }
}

impl FromStr for RsvpFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" => Ok(RsvpFilter::All),
            "ATTENDING" => Ok(RsvpFilter::Attending),
            "DECLINED" => Ok(RsvpFilter::Declined),
            "PENDING" => Ok(RsvpFilter::Pending),
            other => Err(format!("Unknown filter: {}", other)),
        }
    }
}

/// Counts shown above the admin list. A missing status counts as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RsvpStats {
    pub total: usize,
    pub attending: usize,
    pub declined: usize,
    pub pending: usize,
}

impl RsvpStats {
    pub fn from_items(items: &[InvitationListItem]) -> Self {
        items.iter().fold(
            RsvpStats {
                total: items.len(),
                ..Default::default()
            },
            |mut stats, item| {
                match item.invitation.rsvp_or_pending() {
                    RsvpStatus::Attending => stats.attending += 1,
                    RsvpStatus::Declined => stats.declined += 1,
                    RsvpStatus::Pending => stats.pending += 1,
                }
                stats
            },
        )
    }
}

/// Items matching `filter`, in their original order.
pub fn filter_items(items: &[InvitationListItem], filter: RsvpFilter) -> Vec<&InvitationListItem> {
    items
        .iter()
        .filter(|item| filter.matches(item.invitation.rsvp_or_pending()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Invitation, InvitationStatus};
    use uuid::Uuid;

    fn item(status: Option<RsvpStatus>) -> InvitationListItem {
        InvitationListItem {
            invitation: Invitation {
                id: Uuid::new_v4(),
                slug: None,
                status: InvitationStatus::Published,
                rsvp_status: status,
                attendee_count: None,
                created_at: None,
                title: "Gala".to_string(),
                company_name: "GTE".to_string(),
                recipient_salutation: None,
                recipient_name: "An".to_string(),
                recipient_title: "CEO".to_string(),
                content: String::new(),
                event_time: String::new(),
                event_location: String::new(),
                google_map_url: None,
                schedule: None,
            },
            responses: None,
            attending: 0,
            attending_people: 0,
            declined: 0,
        }
    }

    fn sample() -> Vec<InvitationListItem> {
        vec![
            item(Some(RsvpStatus::Attending)),
            item(Some(RsvpStatus::Declined)),
            item(None),
            item(Some(RsvpStatus::Pending)),
            item(Some(RsvpStatus::Attending)),
        ]
    }

    #[test]
    fn test_stats_count_missing_as_pending() {
        let stats = RsvpStats::from_items(&sample());
        assert_eq!(
            stats,
            RsvpStats {
                total: 5,
                attending: 2,
                declined: 1,
                pending: 2,
            }
        );
    }

    #[test]
    fn test_filter_items() {
        let items = sample();
        assert_eq!(filter_items(&items, RsvpFilter::All).len(), 5);
        assert_eq!(filter_items(&items, RsvpFilter::Attending).len(), 2);
        assert_eq!(filter_items(&items, RsvpFilter::Declined).len(), 1);
        assert_eq!(filter_items(&items, RsvpFilter::Pending).len(), 2);
    }

    #[test]
    fn test_filter_from_str() {
        assert_eq!("PENDING".parse::<RsvpFilter>(), Ok(RsvpFilter::Pending));
        assert!("pending".parse::<RsvpFilter>().is_err());
        assert_eq!(RsvpFilter::default(), RsvpFilter::All);
    }
}
