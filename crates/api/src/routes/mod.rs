//! HTTP route handlers.

pub mod admin_auth;
pub mod admin_import;
pub mod admin_invitations;
pub mod admin_templates;
pub mod form_fields;
pub mod health;
pub mod invite;
pub mod pages;
pub mod public_config;
