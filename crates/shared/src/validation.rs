//! Common validation utilities.

use validator::ValidationError;

/// Smallest party size a guest can confirm.
pub const MIN_ATTENDEES: u8 = 1;

/// Largest party size a guest can confirm.
pub const MAX_ATTENDEES: u8 = 20;

/// Clamps a raw numeric attendee count into `[MIN_ATTENDEES, MAX_ATTENDEES]`.
///
/// Fractions are truncated toward zero before clamping. Non-finite input
/// collapses to the minimum.
pub fn clamp_attendee_count(raw: f64) -> u8 {
    if !raw.is_finite() {
        return MIN_ATTENDEES;
    }
    let truncated = raw.trunc();
    truncated.clamp(MIN_ATTENDEES as f64, MAX_ATTENDEES as f64) as u8
}

/// Parses a number typed into the party-size input.
///
/// Returns `None` when the text is not a finite number, in which case the
/// caller keeps its previous value. Blank input counts as zero and therefore
/// clamps to the minimum.
pub fn parse_attendee_count(raw: &str) -> Option<u8> {
    let trimmed = raw.trim();
    let value = if trimmed.is_empty() {
        0.0
    } else {
        trimmed.parse::<f64>().ok()?
    };
    value.is_finite().then(|| clamp_attendee_count(value))
}

/// Reads a previously stored attendee count.
///
/// Only finite, strictly positive values are accepted; anything else is
/// treated as absent.
pub fn parse_stored_attendee_count(raw: &str) -> Option<u8> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then(|| clamp_attendee_count(value))
}

/// Validates that a required text field is not blank.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Returns `None` for blank strings, otherwise the original value.
///
/// Optional form fields are submitted as `null` rather than empty strings.
pub fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
