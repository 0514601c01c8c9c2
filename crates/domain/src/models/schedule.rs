//! Event schedule (agenda) entries.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// One agenda row: a free-form time label and a description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ScheduleEntry {
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub time: String,
    #[serde(default)]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub label: String,
}

impl ScheduleEntry {
    pub fn new(time: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            label: label.into(),
        }
    }
}

/// Editable column of a schedule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    Time,
    Label,
}

impl FromStr for ScheduleField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(ScheduleField::Time),
            "label" => Ok(ScheduleField::Label),
            other => Err(format!("Unknown schedule field: {}", other)),
        }
    }
}

/// Appends an empty row.
pub fn add_row(schedule: &mut Vec<ScheduleEntry>) {
    schedule.push(ScheduleEntry::default());
}

/// Removes the row at `index`. Out-of-range indexes are ignored.
pub fn remove_row(schedule: &mut Vec<ScheduleEntry>, index: usize) -> bool {
    if index < schedule.len() {
        schedule.remove(index);
        true
    } else {
        false
    }
}

/// Sets one field of the row at `index`. Out-of-range indexes are ignored.
pub fn set_field(
    schedule: &mut [ScheduleEntry],
    index: usize,
    field: ScheduleField,
    value: impl Into<String>,
) -> bool {
    let Some(entry) = schedule.get_mut(index) else {
        return false;
    };
    match field {
        ScheduleField::Time => entry.time = value.into(),
        ScheduleField::Label => entry.label = value.into(),
    }
    true
}

/// Agenda pre-filled on a new template.
pub fn default_schedule() -> Vec<ScheduleEntry> {
    vec![
        ScheduleEntry::new("18:00", "Đón khách & Check-in"),
        ScheduleEntry::new("19:00", "Khai mạc"),
        ScheduleEntry::new("19:30", "Nhập tiệc"),
    ]
}

/// Schedule rows that carry some content, used by the public timeline.
pub fn visible_entries(schedule: &[ScheduleEntry]) -> Vec<ScheduleEntry> {
    schedule
        .iter()
        .filter(|entry| !entry.time.trim().is_empty() || !entry.label.trim().is_empty())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove_rows() {
        let mut schedule = default_schedule();
        add_row(&mut schedule);
        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule[3], ScheduleEntry::default());

        assert!(remove_row(&mut schedule, 0));
        assert_eq!(schedule[0].label, "Khai mạc");
        assert!(!remove_row(&mut schedule, 10));
        assert_eq!(schedule.len(), 3);
    }

    #[test]
    fn test_set_field() {
        let mut schedule = default_schedule();
        assert!(set_field(&mut schedule, 1, ScheduleField::Time, "19:15"));
        assert!(set_field(&mut schedule, 1, ScheduleField::Label, "Phát biểu"));
        assert_eq!(schedule[1], ScheduleEntry::new("19:15", "Phát biểu"));
        assert!(!set_field(&mut schedule, 9, ScheduleField::Time, "20:00"));
    }

    #[test]
    fn test_schedule_field_from_str() {
        assert_eq!("time".parse::<ScheduleField>(), Ok(ScheduleField::Time));
        assert_eq!("label".parse::<ScheduleField>(), Ok(ScheduleField::Label));
        assert!("title".parse::<ScheduleField>().is_err());
    }

    #[test]
    fn test_validate_entry() {
        assert!(ScheduleEntry::new("18:00", "Check-in").validate().is_ok());
        assert!(ScheduleEntry::new("18:00", " ").validate().is_err());
        assert!(ScheduleEntry::new("", "Check-in").validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_entry() {
        let entry: ScheduleEntry = serde_json::from_str(r#"{"time":"18:00"}"#).unwrap();
        assert_eq!(entry.time, "18:00");
        assert_eq!(entry.label, "");
    }

    #[test]
    fn test_visible_entries() {
        let schedule = vec![
            ScheduleEntry::new("18:00", "Check-in"),
            ScheduleEntry::default(),
        ];
        assert_eq!(visible_entries(&schedule).len(), 1);
    }
}
