//! Server-rendered HTML views.
//!
//! Templates live in `crates/api/templates/` and are embedded at compile
//! time, so the binary has no runtime file dependency. Output is
//! auto-escaped.

pub mod components;

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppError;

pub use components::{InvitationView, PREVIEW_RECIPIENT_NAME, PREVIEW_RECIPIENT_TITLE};

macro_rules! embedded {
    ($($name:literal),+ $(,)?) => {
        &[$(($name, include_str!(concat!("../../templates/", $name)))),+]
    };
}

const TEMPLATES: &[(&str, &str)] = embedded![
    "layout.html",
    "macros.html",
    "home.html",
    "invite.html",
    "not_found.html",
    "admin/layout.html",
    "admin/login.html",
    "admin/templates_list.html",
    "admin/template_form.html",
    "admin/invitations_list.html",
    "admin/invitation_form.html",
    "admin/import.html",
];

/// Compiled template set.
#[derive(Debug)]
pub struct Views {
    tera: Tera,
}

impl Views {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.autoescape_on(vec![".html"]);
        Ok(Self { tera })
    }

    /// Renders `name` with a serializable context.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<Html<String>, AppError> {
        let context = Context::from_serialize(context)?;
        Ok(Html(self.tera.render(name, &context)?))
    }
}
