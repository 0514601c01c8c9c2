//! Domain layer for the invitation portal.
//!
//! This crate contains:
//! - Domain models (invitations, templates, schedules, RSVP, import results)
//! - The key-value store abstraction used for guest-side persistence
//! - RSVP reconciliation and the confirmation control
//! - Admin list statistics and filtering

pub mod models;
pub mod services;
