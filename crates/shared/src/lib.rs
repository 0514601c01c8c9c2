//! Shared utilities and common types for the invitation portal.
//!
//! This crate provides common functionality used across all other crates:
//! - Attendee count clamping and form value validation
//! - Event time parsing and display formatting

pub mod datetime;
pub mod validation;
