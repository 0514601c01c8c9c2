//! Event time parsing and display formatting.
//!
//! The backend exchanges event times as ISO-8601 strings that may or may not
//! carry an offset, while admin forms use `datetime-local` values
//! (`YYYY-MM-DDTHH:MM`). Values without an offset are wall-clock times in the
//! display zone.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Wall-clock formats accepted for offset-less values, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Format used by `<input type="datetime-local">`.
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Display format matching the vi-VN locale (`19:00:00 20/12/2025`).
const DISPLAY_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

/// A parsed event time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    /// The value carried an explicit offset.
    Zoned(DateTime<FixedOffset>),
    /// Wall-clock value without offset.
    Local(NaiveDateTime),
}

impl EventTime {
    /// Wall-clock time in the given display zone.
    pub fn in_zone(&self, zone: &FixedOffset) -> NaiveDateTime {
        match self {
            EventTime::Zoned(dt) => dt.with_timezone(zone).naive_local(),
            EventTime::Local(naive) => *naive,
        }
    }
}

/// Builds a display zone from a whole-hour UTC offset.
pub fn display_zone(utc_offset_hours: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(utc_offset_hours.checked_mul(3600)?)
}

/// Parses an event time string.
pub fn parse_event_time(raw: &str) -> Option<EventTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(EventTime::Zoned(dt));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(EventTime::Local)
}

/// Converts a stored event time into a `datetime-local` input value.
///
/// Unparseable values fall back to their first 16 characters so that an
/// already-local value survives a round trip through the form.
pub fn to_datetime_local_value(raw: &str, zone: &FixedOffset) -> String {
    match parse_event_time(raw) {
        Some(time) => time.in_zone(zone).format(DATETIME_LOCAL_FORMAT).to_string(),
        None => raw.chars().take(16).collect(),
    }
}

/// Formats an event time for guests and admin tables.
pub fn format_display(raw: &str, zone: &FixedOffset) -> Option<String> {
    parse_event_time(raw).map(|time| time.in_zone(zone).format(DISPLAY_FORMAT).to_string())
}

/// Formats an event time, echoing the raw value when it cannot be parsed.
pub fn format_display_or_raw(raw: &str, zone: &FixedOffset) -> String {
    format_display(raw, zone).unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vn() -> FixedOffset {
        display_zone(7).unwrap()
    }

    #[test]
    fn test_display_zone() {
        assert_eq!(display_zone(7).unwrap().local_minus_utc(), 7 * 3600);
        assert_eq!(display_zone(-5).unwrap().local_minus_utc(), -5 * 3600);
        assert!(display_zone(30).is_none());
    }

    #[test]
    fn test_parse_event_time_zoned() {
        let parsed = parse_event_time("2025-12-20T12:00:00Z").unwrap();
        assert!(matches!(parsed, EventTime::Zoned(_)));
        assert_eq!(
            parsed.in_zone(&vn()).format("%H:%M").to_string(),
            "19:00"
        );
    }

    #[test]
    fn test_parse_event_time_naive_variants() {
        for raw in [
            "2025-12-20T19:00:00",
            "2025-12-20T19:00:00.123456",
            "2025-12-20T19:00",
            "2025-12-20 19:00:00",
        ] {
            let parsed = parse_event_time(raw).unwrap_or_else(|| panic!("failed on {raw}"));
            assert!(matches!(parsed, EventTime::Local(_)));
            assert_eq!(parsed.in_zone(&vn()).format("%H:%M").to_string(), "19:00");
        }
    }

    #[test]
    fn test_parse_event_time_invalid() {
        assert!(parse_event_time("").is_none());
        assert!(parse_event_time("tomorrow evening").is_none());
    }

    #[test]
    fn test_to_datetime_local_value() {
        assert_eq!(
            to_datetime_local_value("2025-12-20T19:00:00", &vn()),
            "2025-12-20T19:00"
        );
        assert_eq!(
            to_datetime_local_value("2025-12-20T12:00:00+00:00", &vn()),
            "2025-12-20T19:00"
        );
    }

    #[test]
    fn test_to_datetime_local_value_fallback() {
        assert_eq!(
            to_datetime_local_value("not-a-date-at-all-really", &vn()),
            "not-a-date-at-al"
        );
    }

    #[test]
    fn test_format_display() {
        assert_eq!(
            format_display("2025-12-20T19:00:00", &vn()).unwrap(),
            "19:00:00 20/12/2025"
        );
        assert!(format_display("???", &vn()).is_none());
        assert_eq!(format_display_or_raw("???", &vn()), "???");
    }
}
